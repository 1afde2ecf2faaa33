//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use quizhub::auth::{AuthError, Identity, IdentityProvider};
use quizhub::config::{AppConfig, OAuthProviderConfig};
use quizhub::db::{self, session, user};
use quizhub::http::{build_router, AppState};

pub const ADMIN_EMAIL: &str = "admin@quizhub.test";

/// Identity provider that accepts the code `good-code` and returns a fixed
/// profile.
pub struct FakeIdentityProvider {
    pub identity: Identity,
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn exchange(
        &self,
        _provider: &OAuthProviderConfig,
        code: &str,
        _redirect_uri: &str,
    ) -> Result<Identity, AuthError> {
        if code == "good-code" {
            Ok(self.identity.clone())
        } else {
            Err(AuthError::Provider("invalid_grant".into()))
        }
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".into();
    config.database.max_connections = 1;
    config.admin.emails = vec![ADMIN_EMAIL.into()];
    config.auth.providers = vec![OAuthProviderConfig {
        name: "github".into(),
        display_name: Some("GitHub".into()),
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        authorize_url: "https://github.example/login/oauth/authorize".into(),
        token_url: "https://github.example/login/oauth/access_token".into(),
        userinfo_url: "https://api.github.example/user".into(),
        scopes: vec!["read:user".into(), "user:email".into()],
    }];
    config
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: AppConfig,
}

pub async fn app() -> TestApp {
    app_with(test_config()).await
}

pub async fn app_with(config: AppConfig) -> TestApp {
    let db = db::connect(&config.database).await.expect("in-memory database");
    let identity = Arc::new(FakeIdentityProvider {
        identity: Identity {
            provider_account_id: "4242".into(),
            email: "player@quizhub.test".into(),
            name: Some("Player One".into()),
            image: None,
        },
    });
    let state = AppState::new(db.clone(), config.clone(), identity);
    let router = build_router(state).expect("router");
    TestApp { router, db, config }
}

impl TestApp {
    /// Create a user and a live session, returning `(user_id, token)`.
    pub async fn sign_in(&self, email: &str) -> (Uuid, String) {
        let account = user::Mutation::upsert(
            &self.db,
            user::NewUser {
                email: email.into(),
                name: Some(email.split('@').next().unwrap_or_default().into()),
                image: None,
                provider: "github".into(),
                provider_account_id: email.into(),
            },
        )
        .await
        .unwrap();
        let session = session::Mutation::create(&self.db, account.id, 3600).await.unwrap();
        (account.id, session.token)
    }

    pub fn session_cookie(&self, token: &str) -> String {
        format!("{}={token}", self.config.auth.session_cookie)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            headers,
            body: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token.map(|t| self.session_cookie(t)), None))
            .await
    }

    pub async fn json(&self, method: Method, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(method, uri, token.map(|t| self.session_cookie(t)), Some(body)))
            .await
    }
}

/// Build a request that looks like it arrived over TCP from 203.0.113.7.
pub fn request(method: Method, uri: &str, cookie: Option<String>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let mut request = builder.body(body).unwrap();
    let peer: SocketAddr = "203.0.113.7:51000".parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect()
    }
}

/// A public two-question quiz body: first question single-answer (index 1),
/// second multi-select (indices 0 and 2).
pub fn sample_quiz(title: &str, is_public: bool) -> Value {
    serde_json::json!({
        "title": title,
        "description": "Warm-up questions",
        "isPublic": is_public,
        "questions": [
            {
                "content": "2 + 2 = ?",
                "options": ["3", "4", "5"],
                "correctIndices": [1],
                "explanation": "Basic arithmetic",
                "points": 2
            },
            {
                "content": "Which are primes?",
                "options": ["2", "4", "5", "9"],
                "correctIndices": [0, 2],
                "multiSelect": true,
                "points": 3
            }
        ]
    })
}

/// Create a quiz through the API and return its JSON.
pub async fn create_quiz(app: &TestApp, token: &str, body: Value) -> Value {
    let response = app.json(Method::POST, "/api/quizzes", Some(token), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
    response.json()
}
