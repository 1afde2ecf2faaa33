use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AdminUser;
use crate::db::entity::contact::{self, Status as ContactStatus};
use crate::db::{category, contact as contacts, quiz, score, session, user};
use crate::http::error::ApiError;
use crate::http::extract::{ApiJson, ValidatedJson};
use crate::http::handlers::categories::CategoryView;
use crate::http::handlers::quizzes::QuizSummary;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct ContactCounts {
    pub new: u64,
    pub read: u64,
    pub resolved: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub users: u64,
    pub quizzes: u64,
    pub public_quizzes: u64,
    pub attempts: u64,
    pub contacts: ContactCounts,
    pub rate_limited_clients: usize,
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let db = &state.db;
    Ok(Json(Stats {
        users: user::Query::count(db).await?,
        quizzes: quiz::Query::count(db).await?,
        public_quizzes: quiz::Query::count_public(db).await?,
        attempts: score::Query::count(db).await?,
        contacts: ContactCounts {
            new: contacts::Query::count_by_status(db, ContactStatus::New).await?,
            read: contacts::Query::count_by_status(db, ContactStatus::Read).await?,
            resolved: contacts::Query::count_by_status(db, ContactStatus::Resolved).await?,
        },
        rate_limited_clients: state.contact_limiter.len(),
    }))
}

#[derive(Deserialize)]
pub struct ContactFilter {
    pub status: Option<ContactStatus>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<contact::Model> for ContactView {
    fn from(contact: contact::Model) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            message: contact.message,
            status: contact.status,
            ip: contact.ip,
            created_at: contact.created_at,
        }
    }
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<ContactView>>, ApiError> {
    let list = contacts::Query::list(&state.db, filter.status).await?;
    Ok(Json(list.into_iter().map(ContactView::from).collect()))
}

#[derive(Deserialize)]
pub struct ContactUpdate {
    pub status: ContactStatus,
}

pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(update): ApiJson<ContactUpdate>,
) -> Result<Json<ContactView>, ApiError> {
    let updated = contacts::Mutation::set_status(&state.db, id, update.status)
        .await?
        .ok_or(ApiError::NotFound("contact"))?;
    Ok(Json(updated.into()))
}

pub async fn delete_contact(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if contacts::Mutation::delete(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("contact"))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub provider: String,
    pub banned: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

fn user_view(state: &AppState, user: crate::db::entity::user::Model) -> UserView {
    UserView {
        is_admin: state.admins.contains(&user.email),
        id: user.id,
        email: user.email,
        name: user.name,
        provider: user.provider,
        banned: user.banned,
        created_at: user.created_at,
    }
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let users = user::Query::list(&state.db).await?;
    Ok(Json(users.into_iter().map(|u| user_view(&state, u)).collect()))
}

#[derive(Deserialize)]
pub struct UserUpdate {
    pub banned: bool,
}

/// Ban or unban. Banning also ends every session of the user.
pub async fn update_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    ApiJson(update): ApiJson<UserUpdate>,
) -> Result<Json<UserView>, ApiError> {
    if id == admin.user.id {
        return Err(ApiError::field("banned", "administrators cannot ban themselves"));
    }
    if user::Query::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("user"));
    }

    let updated = user::Mutation::set_banned(&state.db, id, update.banned).await?;
    if update.banned {
        let ended = session::Mutation::delete_for_user(&state.db, id).await?;
        tracing::info!(user_id = %id, admin = %admin.user.email, sessions_ended = ended, "User banned");
    } else {
        tracing::info!(user_id = %id, admin = %admin.user.email, "User unbanned");
    }
    Ok(Json(user_view(&state, updated)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if id == admin.user.id {
        return Err(ApiError::field("id", "administrators cannot delete themselves"));
    }
    if !user::Mutation::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("user"));
    }
    tracing::info!(user_id = %id, admin = %admin.user.email, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizModeration {
    pub is_public: bool,
}

pub async fn update_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiJson(update): ApiJson<QuizModeration>,
) -> Result<Json<QuizSummary>, ApiError> {
    if quiz::Query::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("quiz"));
    }
    let updated = quiz::Mutation::set_visibility(&state.db, id, update.is_public).await?;
    tracing::info!(quiz_id = %id, is_public = update.is_public, "Quiz visibility changed by admin");
    Ok(Json(updated.into()))
}

pub async fn delete_quiz(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if !quiz::Mutation::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("quiz"));
    }
    tracing::info!(quiz_id = %id, "Quiz deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize, Validate)]
pub struct NewCategory {
    #[validate(length(min = 2, max = 50, message = "must be between 2 and 50 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

pub async fn create_category(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewCategory>,
) -> Result<(StatusCode, Json<CategoryView>), ApiError> {
    let name = input.name.trim().to_owned();
    let slug = category::slugify(&name);
    if slug.is_empty() {
        return Err(ApiError::field("name", "must contain at least one letter or digit"));
    }
    if category::Query::find_conflict(&state.db, &name, &slug).await?.is_some() {
        return Err(ApiError::field("name", "a category with this name already exists"));
    }

    let created = category::Mutation::create(&state.db, name, slug, input.description).await?;
    tracing::info!(category_id = %created.id, slug = %created.slug, "Category created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn delete_category(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if !category::Mutation::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("category"));
    }
    tracing::info!(category_id = %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
