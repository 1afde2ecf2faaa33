//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → routing::guard (cookie presence pre-filter for page paths)
//!     → rate_limit.rs (per-IP fixed windows on public write endpoints)
//!     → auth (authoritative session check in handlers)
//! Outgoing response:
//!     → headers.rs (security headers)
//! ```
//!
//! # Design Decisions
//! - Defense in depth: the edge guard is a fast approximation, handlers
//!   always re-check the session against the database
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
pub mod rate_limit;

pub use rate_limit::{ContactLimit, Decision, FixedWindowLimiter};
