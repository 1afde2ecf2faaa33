//! Whole-attempt scoring.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::evaluator::{evaluate, Verdict};
use crate::db::entity::question;

/// The grading key of one question.
#[derive(Debug, Clone)]
pub struct GradedQuestion {
    pub id: Uuid,
    pub correct_indices: Vec<u32>,
    pub points: i32,
    pub explanation: Option<String>,
}

impl TryFrom<&question::Model> for GradedQuestion {
    type Error = serde_json::Error;

    fn try_from(model: &question::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            correct_indices: model.correct_index_list()?,
            points: model.points,
            explanation: model.explanation.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub question_id: Uuid,
    pub selected: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: Uuid,
    #[serde(flatten)]
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResult {
    pub points: i32,
    pub max_points: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub results: Vec<QuestionResult>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(Uuid),
    #[error("question {0} was answered more than once")]
    DuplicateAnswer(Uuid),
}

/// Grade every question of a quiz. Unanswered questions are incorrect.
pub fn score_attempt(questions: &[GradedQuestion], answers: &[Answer]) -> Result<AttemptResult, ScoringError> {
    let mut by_question: HashMap<Uuid, &[u32]> = HashMap::with_capacity(answers.len());
    for answer in answers {
        if !questions.iter().any(|q| q.id == answer.question_id) {
            return Err(ScoringError::UnknownQuestion(answer.question_id));
        }
        if by_question.insert(answer.question_id, &answer.selected).is_some() {
            return Err(ScoringError::DuplicateAnswer(answer.question_id));
        }
    }

    let mut result = AttemptResult {
        points: 0,
        max_points: 0,
        correct_count: 0,
        total_questions: i32::try_from(questions.len()).unwrap_or(i32::MAX),
        results: Vec::with_capacity(questions.len()),
    };

    for question in questions {
        let selected = by_question.get(&question.id).copied().unwrap_or(&[]);
        let verdict = evaluate(&question.correct_indices, selected, question.explanation.as_deref());

        result.max_points = result.max_points.saturating_add(question.points);
        if verdict.correct {
            result.points = result.points.saturating_add(question.points);
            result.correct_count += 1;
        }
        result.results.push(QuestionResult {
            question_id: question.id,
            verdict,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: &[u32], points: i32) -> GradedQuestion {
        GradedQuestion {
            id: Uuid::new_v4(),
            correct_indices: correct.to_vec(),
            points,
            explanation: None,
        }
    }

    fn answer(q: &GradedQuestion, selected: &[u32]) -> Answer {
        Answer {
            question_id: q.id,
            selected: selected.to_vec(),
        }
    }

    #[test]
    fn test_sums_points_of_correct_questions() {
        let questions = vec![question(&[0], 10), question(&[1, 2], 5), question(&[3], 1)];
        let answers = vec![
            answer(&questions[0], &[0]),
            answer(&questions[1], &[2, 1]),
            answer(&questions[2], &[0]),
        ];

        let result = score_attempt(&questions, &answers).unwrap();

        assert_eq!(result.points, 15);
        assert_eq!(result.max_points, 16);
        assert_eq!(result.correct_count, 2);
        assert_eq!(result.total_questions, 3);
        assert!(!result.results[2].verdict.correct);
    }

    #[test]
    fn test_unanswered_counts_as_incorrect() {
        let questions = vec![question(&[0], 3), question(&[1], 4)];
        let answers = vec![answer(&questions[1], &[1])];

        let result = score_attempt(&questions, &answers).unwrap();

        assert_eq!(result.points, 4);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.results.len(), 2);
        assert!(!result.results[0].verdict.correct);
    }

    #[test]
    fn test_foreign_question_is_rejected() {
        let questions = vec![question(&[0], 1)];
        let stranger = question(&[0], 1);

        let err = score_attempt(&questions, &[answer(&stranger, &[0])]).unwrap_err();
        assert_eq!(err, ScoringError::UnknownQuestion(stranger.id));
    }

    #[test]
    fn test_duplicate_answer_is_rejected() {
        let questions = vec![question(&[0], 1)];
        let answers = vec![answer(&questions[0], &[0]), answer(&questions[0], &[1])];

        let err = score_attempt(&questions, &answers).unwrap_err();
        assert_eq!(err, ScoringError::DuplicateAnswer(questions[0].id));
    }
}
