//! HTTP layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request id, tracing, metrics, timeout, body limit)
//!     → routing::guard (page paths only)
//!     → handlers/* (extract.rs + auth extractors, then db + quiz logic)
//!     → error.rs (failures rendered as JSON)
//! ```

pub mod cookies;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::{ApiError, FieldError};
pub use server::{build_router, AppState, HttpServer, X_REQUEST_ID};
