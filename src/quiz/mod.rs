//! Quiz domain logic.
//!
//! Everything here is synchronous and side-effect free. Handlers load rows,
//! call into these functions and persist the outcome.

pub mod evaluator;
pub mod ranking;
pub mod scoring;
pub mod validation;

pub use evaluator::{evaluate, is_correct, Verdict};
pub use scoring::{score_attempt, Answer, AttemptResult, GradedQuestion, ScoringError};
