//! Playing a quiz: fetching questions, checking answers, submitting attempts.

use axum::extract::{Path, State};
use axum::Json;
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::quizzes::{load_visible, question_views, QuestionView, QuizSummary};
use crate::auth::{CurrentUser, OptionalUser};
use crate::db::quiz::{Mutation as QuizMutation, Query as QuizQuery};
use crate::db::score::{Mutation as ScoreMutation, NewScore};
use crate::http::error::ApiError;
use crate::http::extract::{ApiJson, ValidatedJson};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::quiz::validation::parse_selected;
use crate::quiz::{evaluate, score_attempt, Answer, AttemptResult, GradedQuestion, Verdict};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayView {
    #[serde(flatten)]
    pub quiz: QuizSummary,
    pub questions: Vec<QuestionView>,
}

/// Questions of a visible quiz, without answers.
pub async fn play(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayView>, ApiError> {
    let quiz = load_visible(&state, id, &viewer).await?;
    let questions = QuizQuery::questions(&state.db, quiz.id).await?;

    Ok(Json(PlayView {
        quiz: quiz.into(),
        questions: question_views(questions, false)?,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInput {
    pub question_id: Uuid,
    pub selected_indices: Vec<i64>,
}

/// Check one answer. A question outside this quiz is reported as missing
/// and no verdict is produced.
pub async fn check(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<CheckInput>,
) -> Result<Json<Verdict>, ApiError> {
    let selected =
        parse_selected("selectedIndices", &input.selected_indices).map_err(|e| ApiError::Validation(vec![e]))?;

    let quiz = load_visible(&state, id, &viewer).await?;
    let question = QuizQuery::find_question(&state.db, quiz.id, input.question_id)
        .await?
        .ok_or(ApiError::NotFound("question"))?;

    let correct = question.correct_index_list()?;
    let verdict = evaluate(&correct, &selected, question.explanation.as_deref());
    metrics::record_answer_checked(verdict.correct);
    tracing::debug!(quiz_id = %quiz.id, question_id = %question.id, correct = verdict.correct, "Answer checked");

    Ok(Json(verdict))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question_id: Uuid,
    pub selected_indices: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInput {
    pub answers: Vec<AnswerInput>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub time_taken_secs: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResult {
    pub score_id: Uuid,
    #[serde(flatten)]
    pub result: AttemptResult,
}

/// Grade and record a full attempt.
pub async fn submit(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<SubmitInput>,
) -> Result<Json<SubmitResult>, ApiError> {
    let answers = input
        .answers
        .iter()
        .enumerate()
        .map(|(i, answer)| {
            let field = format!("answers[{i}].selectedIndices");
            parse_selected(&field, &answer.selected_indices).map(|selected| Answer {
                question_id: answer.question_id,
                selected,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::Validation(vec![e]))?;

    let viewer = OptionalUser(Some(user.clone()));
    let quiz = load_visible(&state, id, &viewer).await?;
    let questions = QuizQuery::questions(&state.db, quiz.id)
        .await?
        .iter()
        .map(GradedQuestion::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let result = score_attempt(&questions, &answers)?;

    let txn = state.db.begin().await?;
    let score = ScoreMutation::record(
        &txn,
        NewScore {
            quiz_id: quiz.id,
            user_id: user.user.id,
            points: result.points,
            max_points: result.max_points,
            correct_count: result.correct_count,
            total_questions: result.total_questions,
            time_taken_secs: input.time_taken_secs,
        },
    )
    .await?;
    QuizMutation::increment_play_count(&txn, quiz.id).await?;
    txn.commit().await?;

    metrics::record_attempt();
    tracing::info!(
        quiz_id = %quiz.id,
        user_id = %user.user.id,
        points = result.points,
        max_points = result.max_points,
        "Attempt recorded"
    );

    Ok(Json(SubmitResult {
        score_id: score.id,
        result,
    }))
}
