//! OAuth sign-in, sign-out and session endpoints.

use std::error::Error;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::oauth::generate_state;
use crate::auth::{authorize_url, AuthError, OptionalUser};
use crate::config::OAuthProviderConfig;
use crate::db::{session, user};
use crate::http::cookies::{self, CookieOptions};
use crate::http::error::ApiError;
use crate::http::server::AppState;

pub const STATE_COOKIE: &str = "quizhub_oauth_state";
pub const CALLBACK_COOKIE: &str = "quizhub_callback";
const FLOW_COOKIE_MAX_AGE: u64 = 10 * 60;

/// Only same-site relative paths are accepted as post-login targets.
pub fn safe_callback<'a>(candidate: Option<&'a str>, fallback: &'a str) -> &'a str {
    match candidate {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => fallback,
    }
}

fn encode_cookie_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn decode_cookie_value(value: &str) -> String {
    url::form_urlencoded::parse(format!("v={value}").as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default()
}

fn redirect_uri(state: &AppState, provider: &OAuthProviderConfig) -> String {
    format!(
        "{}/api/auth/callback/{}",
        state.config.server.public_url.trim_end_matches('/'),
        provider.name
    )
}

fn cookie(name: &str, value: &str, max_age: u64, state: &AppState) -> Result<HeaderValue, ApiError> {
    let options = CookieOptions {
        secure: state.config.auth.secure_cookies,
        http_only: true,
    };
    cookies::set_cookie(name, value, max_age, options)
        .ok_or_else(|| ApiError::Internal(format!("invalid value for cookie {name}")))
}

fn cleared(name: &str) -> Result<HeaderValue, ApiError> {
    cookies::clear_cookie(name).ok_or_else(|| ApiError::Internal(format!("invalid cookie name {name}")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub name: String,
    pub display_name: String,
    pub signin_url: String,
}

pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderView>> {
    Json(
        state
            .config
            .auth
            .providers
            .iter()
            .map(|p| ProviderView {
                name: p.name.clone(),
                display_name: p.label().to_owned(),
                signin_url: format!("/api/auth/signin/{}", p.name),
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninParams {
    pub callback_url: Option<String>,
}

/// Start the authorization-code flow.
pub async fn signin(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SigninParams>,
) -> Result<Response, ApiError> {
    let provider = state
        .config
        .auth
        .provider(&name)
        .ok_or(ApiError::NotFound("provider"))?;

    let oauth_state = generate_state();
    let target = safe_callback(params.callback_url.as_deref(), &state.config.auth.dashboard_path);
    let url = authorize_url(provider, &redirect_uri(&state, provider), &oauth_state)
        .map_err(|e| ApiError::Internal(format!("bad authorize url for {name}: {e}")))?;

    tracing::debug!(provider = %name, "Starting OAuth sign-in");
    Ok((
        AppendHeaders([
            (header::SET_COOKIE, cookie(STATE_COOKIE, &oauth_state, FLOW_COOKIE_MAX_AGE, &state)?),
            (
                header::SET_COOKIE,
                cookie(CALLBACK_COOKIE, &encode_cookie_value(target), FLOW_COOKIE_MAX_AGE, &state)?,
            ),
        ]),
        Redirect::to(url.as_str()),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn login_error(state: &AppState, code: &str) -> Response {
    Redirect::to(&format!("{}?error={code}", state.config.auth.login_path)).into_response()
}

/// Finish the flow: verify state, exchange the code, sign the user in.
pub async fn callback(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let provider = state
        .config
        .auth
        .provider(&name)
        .ok_or(ApiError::NotFound("provider"))?;

    if let Some(error) = params.error {
        tracing::warn!(provider = %name, error = %error, "Provider denied sign-in");
        return Ok(login_error(&state, "OAuthCallback"));
    }

    let expected = cookies::get_cookie(&headers, STATE_COOKIE);
    let code = match (params.code, params.state, expected) {
        (Some(code), Some(got), Some(expected)) if !expected.is_empty() && got == expected => code,
        _ => {
            tracing::warn!(provider = %name, error = %AuthError::StateMismatch, "Rejected OAuth callback");
            return Ok(login_error(&state, "OAuthState"));
        }
    };

    let identity = match state.identity.exchange(provider, &code, &redirect_uri(&state, provider)).await {
        Ok(identity) => identity,
        Err(error) => {
            tracing::warn!(provider = %name, error = &error as &dyn Error, "OAuth exchange failed");
            return Ok(login_error(&state, "OAuthCallback"));
        }
    };

    let account = user::Mutation::upsert(
        &state.db,
        user::NewUser {
            email: identity.email,
            name: identity.name,
            image: identity.image,
            provider: provider.name.clone(),
            provider_account_id: identity.provider_account_id,
        },
    )
    .await?;
    if account.banned {
        tracing::info!(user_id = %account.id, "Banned user attempted sign-in");
        return Ok(login_error(&state, "AccessDenied"));
    }

    let ttl = state.config.auth.session_ttl_secs;
    let new_session = session::Mutation::create(&state.db, account.id, ttl).await?;
    tracing::info!(user_id = %account.id, provider = %name, "User signed in");

    let target = cookies::get_cookie(&headers, CALLBACK_COOKIE)
        .map(decode_cookie_value)
        .unwrap_or_default();
    let target = safe_callback(Some(target.as_str()), &state.config.auth.dashboard_path).to_owned();

    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                cookie(&state.config.auth.session_cookie, &new_session.token, ttl, &state)?,
            ),
            (header::SET_COOKIE, cleared(STATE_COOKIE)?),
            (header::SET_COOKIE, cleared(CALLBACK_COOKIE)?),
        ]),
        Redirect::to(&target),
    )
        .into_response())
}

/// Delete the caller's session and clear every session cookie.
pub async fn signout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let names = state.config.auth.session_cookie_names();
    let mut set_cookies = Vec::with_capacity(names.len());
    for name in &names {
        if let Some(token) = cookies::get_cookie(&headers, name).filter(|t| !t.is_empty()) {
            session::Mutation::delete(&state.db, token).await?;
        }
        set_cookies.push((header::SET_COOKIE, cleared(name)?));
    }

    Ok((AppendHeaders(set_cookies), Json(serde_json::json!({ "success": true }))).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub is_admin: bool,
}

/// The signed-in user, or `null`.
pub async fn session(viewer: OptionalUser) -> Json<Option<SessionUser>> {
    Json(viewer.0.map(|current| SessionUser {
        id: current.user.id,
        email: current.user.email,
        name: current.user.name,
        image: current.user.image,
        is_admin: current.is_admin,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_callback() {
        assert_eq!(safe_callback(Some("/quiz/1/play?x=1"), "/dashboard"), "/quiz/1/play?x=1");
        assert_eq!(safe_callback(Some("https://evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_callback(Some("//evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_callback(Some("/\\evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_callback(None, "/dashboard"), "/dashboard");
    }

    #[test]
    fn test_cookie_value_encoding() {
        let raw = "/quiz/abc/play?round=2&mode=fast";
        let encoded = encode_cookie_value(raw);

        assert!(!encoded.contains(';') && !encoded.contains('&'));
        assert_eq!(decode_cookie_value(&encoded), raw);
    }
}
