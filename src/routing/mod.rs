//! Edge routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query, cookies)
//!     → guard.rs (skip API/static/SEO paths, check protection)
//!     → matcher.rs (evaluate compiled path patterns)
//!     → Pass, or redirect to login / dashboard
//!
//! Pattern Compilation (at startup):
//!     auth.protected_paths[]
//!     → Compile to anchored regexes (order preserved)
//!     → Freeze as immutable RouteGuard
//! ```
//!
//! # Design Decisions
//! - Patterns compiled at startup, immutable at runtime
//! - Deterministic: same input always gives the same decision
//! - First match wins (configuration order)

pub mod guard;
pub mod matcher;

pub use guard::{route_guard_middleware, GuardDecision, RouteGuard};
