//! OAuth sign-in flow, session resolution and sign-out.

use axum::http::{header, Method, StatusCode};
use serde_json::Value;

use quizhub::db::{session, user};

mod common;

/// `name=value` part of the first `Set-Cookie` for `name`.
fn cookie_pair(response: &common::TestResponse, name: &str) -> Option<String> {
    response
        .set_cookies()
        .into_iter()
        .filter_map(|c| c.split(';').next().map(str::to_owned))
        .find(|pair| pair.starts_with(&format!("{name}=")))
}

fn cookie_value(pair: &str) -> &str {
    pair.split_once('=').map(|(_, v)| v).unwrap_or_default()
}

async fn start_signin(app: &common::TestApp) -> (String, String) {
    let response = app
        .get("/api/auth/signin/github?callbackUrl=%2Fquiz%2Fabc%2Fplay", None)
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let location = response.header(header::LOCATION).unwrap();
    assert!(location.starts_with("https://github.example/login/oauth/authorize?"), "{location}");
    assert!(location.contains("client_id=client-id"));

    let state = cookie_pair(&response, "quizhub_oauth_state").unwrap();
    let callback = cookie_pair(&response, "quizhub_callback").unwrap();
    assert!(location.contains(&format!("state={}", cookie_value(&state))));
    (state, callback)
}

#[test_log::test(tokio::test)]
async fn test_full_signin_flow_sets_session_cookie() {
    let app = common::app().await;
    let (state, callback) = start_signin(&app).await;

    let uri = format!("/api/auth/callback/github?code=good-code&state={}", cookie_value(&state));
    let response = app
        .send(common::request(Method::GET, &uri, Some(format!("{state}; {callback}")), None))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), Some("/quiz/abc/play"));

    let set_cookies = response.set_cookies();
    let session_cookie = set_cookies
        .iter()
        .find(|c| c.starts_with("quizhub_session="))
        .unwrap();
    assert!(session_cookie.contains("HttpOnly"));
    let token = cookie_value(session_cookie.split(';').next().unwrap()).to_owned();

    let current = app.get("/api/auth/session", Some(&token)).await.json();
    assert_eq!(current["email"], "player@quizhub.test");
    assert_eq!(current["isAdmin"], false);

    let stored = user::Query::find_by_email(&app.db, "player@quizhub.test").await.unwrap().unwrap();
    assert_eq!(stored.provider, "github");
    assert_eq!(stored.provider_account_id, "4242");
}

#[tokio::test]
async fn test_state_mismatch_is_rejected() {
    let app = common::app().await;
    let (state, _) = start_signin(&app).await;

    let response = app
        .send(common::request(
            Method::GET,
            "/api/auth/callback/github?code=good-code&state=forged",
            Some(state),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header(header::LOCATION), Some("/login?error=OAuthState"));
    assert!(cookie_pair(&response, "quizhub_session").is_none());
}

#[tokio::test]
async fn test_failed_exchange_redirects_to_login() {
    let app = common::app().await;
    let (state, _) = start_signin(&app).await;

    let uri = format!("/api/auth/callback/github?code=bad-code&state={}", cookie_value(&state));
    let response = app.send(common::request(Method::GET, &uri, Some(state), None)).await;
    assert_eq!(response.header(header::LOCATION), Some("/login?error=OAuthCallback"));
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let app = common::app().await;
    let response = app.get("/api/auth/signin/myspace", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signout_deletes_session() {
    let app = common::app().await;
    let (_, token) = app.sign_in("player@quizhub.test").await;
    assert!(app.get("/api/auth/session", Some(&token)).await.json().is_object());

    let response = app
        .send(common::request(Method::POST, "/api/auth/signout", Some(app.session_cookie(&token)), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .set_cookies()
        .iter()
        .any(|c| c.starts_with("quizhub_session=;") && c.contains("Max-Age=0")));

    assert_eq!(app.get("/api/auth/session", Some(&token)).await.json(), Value::Null);
}

#[tokio::test]
async fn test_expired_session_is_unauthorized() {
    let app = common::app().await;
    let (user_id, _) = app.sign_in("player@quizhub.test").await;
    let expired = session::Mutation::create(&app.db, user_id, 0).await.unwrap();

    let response = app.get("/api/users/me/quizzes", Some(&expired.token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Expired sessions are removed once seen.
    assert!(session::Query::find_with_user(&app.db, &expired.token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_banned_user_session_is_unauthorized() {
    let app = common::app().await;
    let (user_id, token) = app.sign_in("player@quizhub.test").await;
    user::Mutation::set_banned(&app.db, user_id, true).await.unwrap();

    let response = app.get("/api/users/me/scores", Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_flag_follows_allowlist() {
    let app = common::app().await;
    let (_, token) = app.sign_in(common::ADMIN_EMAIL).await;
    assert_eq!(app.get("/api/auth/session", Some(&token)).await.json()["isAdmin"], true);
}
