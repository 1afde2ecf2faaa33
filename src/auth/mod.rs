//! Authentication.
//!
//! # Data Flow
//! ```text
//! Sign-in:
//!     /api/auth/signin/{provider} → state + callback cookies → provider consent
//!     /api/auth/callback/{provider} → oauth.rs (code exchange, profile)
//!         → upsert user → new session row → session cookie
//!
//! Every authenticated request:
//!     session cookie → session.rs (load session + user, expiry, ban)
//!         → CurrentUser / OptionalUser / AdminUser extractors
//! ```
//!
//! The route guard in [`crate::routing`] only looks for the cookie. The
//! extractors here are what actually authenticate a request.

pub mod error;
pub mod oauth;
pub mod session;

pub use error::AuthError;
pub use oauth::{authorize_url, HttpIdentityProvider, Identity, IdentityProvider};
pub use session::{AdminUser, CurrentUser, OptionalUser};
