//! Request handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod contact;
pub mod health;
pub mod pages;
pub mod play;
pub mod quizzes;
pub mod rankings;
pub mod users;

use serde::Deserialize;

/// `?limit=` for ranking style lists.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}

impl LimitParams {
    pub const DEFAULT: u64 = 10;
    pub const MAX: u64 = 100;

    pub fn resolve(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT).clamp(1, Self::MAX) as usize
    }
}
