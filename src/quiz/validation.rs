//! Authoring rules that span more than one field of a question.
//!
//! Single-field limits (lengths, ranges) are declared on the request types
//! with `validator`. The checks here need the option list and the
//! multi-select flag together.

use std::collections::HashSet;

use crate::http::error::FieldError;

pub const MAX_OPTION_LENGTH: usize = 500;

/// Check one question's options and correct indices. `index` is the
/// question's position in the submitted list, used for field paths.
pub fn check_question(index: usize, options: &[String], correct: &[i64], multi_select: bool) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (i, option) in options.iter().enumerate() {
        let length = option.trim().chars().count();
        if length == 0 || option.chars().count() > MAX_OPTION_LENGTH {
            errors.push(FieldError::new(
                format!("questions[{index}].options[{i}]"),
                format!("must be between 1 and {MAX_OPTION_LENGTH} characters"),
            ));
        }
    }

    let field = format!("questions[{index}].correctIndices");
    if correct.is_empty() {
        errors.push(FieldError::new(field, "at least one option must be marked correct"));
        return errors;
    }
    if correct.iter().any(|&i| i < 0 || i as usize >= options.len()) {
        errors.push(FieldError::new(field.clone(), "index out of range"));
    }
    let unique: HashSet<i64> = correct.iter().copied().collect();
    if unique.len() != correct.len() {
        errors.push(FieldError::new(field.clone(), "must not contain duplicates"));
    }
    if !multi_select && unique.len() != 1 {
        errors.push(FieldError::new(field, "exactly one correct option is required unless multiSelect is set"));
    }

    errors
}

/// Submitted answer indices must be non-negative and fit in `u32`.
/// Out-of-range values that pass this check simply grade as incorrect.
pub fn parse_selected(field: &str, selected: &[i64]) -> Result<Vec<u32>, FieldError> {
    selected
        .iter()
        .map(|&i| u32::try_from(i).map_err(|_| FieldError::new(field, "indices must be non-negative integers")))
        .collect()
}
