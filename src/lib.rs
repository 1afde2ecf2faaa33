//! QuizHub: quiz authoring, play and ranking service.

pub mod admin;
pub mod auth;
pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod quiz;
pub mod routing;
pub mod security;

pub use config::AppConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
