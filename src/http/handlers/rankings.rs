//! Per-quiz leaderboards and the global ranking.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::quizzes::load_visible;
use super::LimitParams;
use crate::auth::OptionalUser;
use crate::db::entity::user;
use crate::db::{score, user as users};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::quiz::ranking::{best_per_user, global_ranking};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: Uuid,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<&user::Model> for PlayerRef {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user: PlayerRef,
    pub points: i32,
    pub max_points: i32,
    pub time_taken_secs: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalEntry {
    pub rank: usize,
    pub user: PlayerRef,
    pub total_points: i64,
    pub quizzes_played: u32,
}

/// Users by id, with banned accounts left out.
async fn ranked_users(state: &AppState, ids: Vec<Uuid>) -> Result<HashMap<Uuid, user::Model>, ApiError> {
    Ok(users::Query::find_many(&state.db, ids)
        .await?
        .into_iter()
        .filter(|user| !user.banned)
        .map(|user| (user.id, user))
        .collect())
}

pub async fn leaderboard(
    State(state): State<AppState>,
    viewer: OptionalUser,
    Path(id): Path<Uuid>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let quiz = load_visible(&state, id, &viewer).await?;
    let best = best_per_user(score::Query::for_quiz(&state.db, quiz.id).await?);
    let users = ranked_users(&state, best.iter().map(|s| s.user_id).collect()).await?;

    let entries = best
        .into_iter()
        .filter_map(|score| users.get(&score.user_id).map(|user| (score, user)))
        .take(params.resolve())
        .enumerate()
        .map(|(i, (score, user))| LeaderboardEntry {
            rank: i + 1,
            user: user.into(),
            points: score.points,
            max_points: score.max_points,
            time_taken_secs: score.time_taken_secs,
            created_at: score.created_at,
        })
        .collect();
    Ok(Json(entries))
}

pub async fn global(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<GlobalEntry>>, ApiError> {
    let standings = global_ranking(&score::Query::for_public_quizzes(&state.db).await?);
    let users = ranked_users(&state, standings.iter().map(|s| s.user_id).collect()).await?;

    let entries = standings
        .into_iter()
        .filter_map(|standing| users.get(&standing.user_id).map(|user| (standing, user)))
        .take(params.resolve())
        .enumerate()
        .map(|(i, (standing, user))| GlobalEntry {
            rank: i + 1,
            user: user.into(),
            total_points: standing.total_points,
            quizzes_played: standing.quizzes_played,
        })
        .collect();
    Ok(Json(entries))
}
