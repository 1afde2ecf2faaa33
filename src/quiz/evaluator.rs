//! Answer evaluation.
//!
//! A submission is correct when it selects exactly the stored set of
//! correct options. Order and duplicates are ignored. There is no partial
//! credit.

use std::collections::BTreeSet;

use serde::Serialize;

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub correct: bool,
    /// Sorted and deduplicated.
    pub correct_indices: Vec<u32>,
    pub explanation: Option<String>,
}

fn canonical(indices: &[u32]) -> BTreeSet<u32> {
    indices.iter().copied().collect()
}

/// Set equality between the submitted and the correct indices.
pub fn is_correct(submitted: &[u32], correct: &[u32]) -> bool {
    canonical(submitted) == canonical(correct)
}

pub fn evaluate(correct: &[u32], submitted: &[u32], explanation: Option<&str>) -> Verdict {
    let expected = canonical(correct);
    Verdict {
        correct: canonical(submitted) == expected,
        correct_indices: expected.into_iter().collect(),
        explanation: explanation.map(str::to_owned),
    }
}
