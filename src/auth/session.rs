//! Session-backed request extractors.
//!
//! These are the authority on who is calling. A session counts only if its
//! row exists, has not expired, and its user is not banned. The result is
//! cached in the request extensions so several extractors on one request
//! hit the database once.

use std::error::Error;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::Utc;
use sea_orm::DbErr;

use crate::db::entity::user;
use crate::db::session;
use crate::http::cookies;
use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
    pub token: String,
    pub is_admin: bool,
}

/// Resolve the caller from the session cookie, if any.
pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<Option<CurrentUser>, DbErr> {
    for name in state.config.auth.session_cookie_names() {
        let Some(token) = cookies::get_cookie(headers, &name).filter(|t| !t.is_empty()) else {
            continue;
        };

        let Some((session, user)) = session::Query::find_with_user(&state.db, token).await? else {
            tracing::debug!(cookie = %name, "Unknown session token");
            continue;
        };

        if session.is_expired(Utc::now()) {
            tracing::debug!(user_id = %user.id, "Session expired");
            if let Err(error) = session::Mutation::delete(&state.db, token).await {
                tracing::warn!(error = &error as &dyn Error, "Failed to delete expired session");
            }
            continue;
        }
        if user.banned {
            tracing::info!(user_id = %user.id, "Rejected session of banned user");
            continue;
        }

        let is_admin = state.admins.contains(&user.email);
        return Ok(Some(CurrentUser {
            user,
            token: token.to_owned(),
            is_admin,
        }));
    }
    Ok(None)
}

async fn cached(parts: &mut Parts, state: &AppState) -> Result<Option<CurrentUser>, ApiError> {
    if let Some(current) = parts.extensions.get::<Option<CurrentUser>>() {
        return Ok(current.clone());
    }
    let current = resolve(state, &parts.headers).await?;
    parts.extensions.insert(current.clone());
    Ok(current)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        cached(parts, state).await?.ok_or(ApiError::Unauthorized)
    }
}

/// The caller if signed in. Never rejects for a missing session.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0.as_ref().map(|current| current.user.id)
    }

    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|current| current.is_admin)
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(cached(parts, state).await?))
    }
}

/// A signed-in user on the admin allowlist.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.is_admin {
            tracing::warn!(user_id = %current.user.id, "Non-admin attempted admin access");
            return Err(ApiError::Forbidden);
        }
        Ok(Self(current))
    }
}
