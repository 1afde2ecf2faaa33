//! sea-orm entity definitions.

pub mod category;
pub mod contact;
pub mod question;
pub mod quiz;
pub mod score;
pub mod session;
pub mod user;
