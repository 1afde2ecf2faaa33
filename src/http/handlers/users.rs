use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::quizzes::QuizSummary;
use crate::auth::CurrentUser;
use crate::db::{quiz, score};
use crate::http::error::ApiError;
use crate::http::server::AppState;

pub async fn my_quizzes(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Vec<QuizSummary>>, ApiError> {
    let quizzes = quiz::Query::by_owner(&state.db, user.user.id).await?;
    Ok(Json(quizzes.into_iter().map(QuizSummary::from).collect()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_title: Option<String>,
    pub points: i32,
    pub max_points: i32,
    pub correct_count: i32,
    pub total_questions: i32,
    pub time_taken_secs: Option<i32>,
    pub created_at: DateTime<Utc>,
}

pub async fn my_scores(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Vec<ScoreView>>, ApiError> {
    let scores = score::Query::for_user(&state.db, user.user.id).await?;
    Ok(Json(
        scores
            .into_iter()
            .map(|(score, quiz)| ScoreView {
                id: score.id,
                quiz_id: score.quiz_id,
                quiz_title: quiz.map(|q| q.title),
                points: score.points,
                max_points: score.max_points,
                correct_count: score.correct_count,
                total_questions: score.total_questions,
                time_taken_secs: score.time_taken_secs,
                created_at: score.created_at,
            })
            .collect(),
    ))
}
