//! Edge route guard.
//!
//! Runs before any handler. For protected page paths it only checks that a
//! session cookie is *present*: it never validates the token, its signature
//! or its expiry. A request that passes the guard is still unauthenticated
//! until a handler resolves the cookie through [`crate::auth::CurrentUser`],
//! which is the authority. The guard exists to bounce obviously anonymous
//! visitors to the login view cheaply.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::AuthConfig;
use crate::http::cookies;
use crate::routing::matcher::{AnyMatcher, Matcher};

/// What the guard wants done with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Hand the request to the router unchanged.
    Pass,
    /// Anonymous visitor on a protected path; redirect to this login URL.
    RedirectToLogin(String),
    /// Visitor with a session cookie on the login view.
    RedirectToDashboard(String),
}

/// Cookie-presence pre-filter for page paths.
#[derive(Debug)]
pub struct RouteGuard {
    protected: AnyMatcher,
    login_path: String,
    dashboard_path: String,
    cookie_names: Vec<String>,
}

impl RouteGuard {
    pub fn from_config(auth: &AuthConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            protected: AnyMatcher::compile(&auth.protected_paths)?,
            login_path: auth.login_path.clone(),
            dashboard_path: auth.dashboard_path.clone(),
            cookie_names: auth.session_cookie_names(),
        })
    }

    /// Whether `path` matches one of the protected patterns.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.matches(path)
    }

    /// API routes, static assets and SEO files bypass the guard.
    pub fn should_inspect(path: &str) -> bool {
        if path == "/api" || path.starts_with("/api/") {
            return false;
        }
        if path.starts_with("/static/") || path.starts_with("/_next/") {
            return false;
        }
        if matches!(path, "/favicon.ico" | "/sitemap.xml" | "/robots.txt") {
            return false;
        }
        // Anything that looks like a file (last segment has an extension).
        let last = path.rsplit('/').next().unwrap_or_default();
        !last.contains('.')
    }

    pub fn decide(&self, path: &str, query: Option<&str>, has_session: bool) -> GuardDecision {
        if !Self::should_inspect(path) {
            return GuardDecision::Pass;
        }

        if path == self.login_path && has_session {
            return GuardDecision::RedirectToDashboard(self.dashboard_path.clone());
        }

        if !has_session && self.is_protected(path) {
            let target = match query {
                Some(q) if !q.is_empty() => format!("{path}?{q}"),
                _ => path.to_string(),
            };
            let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            return GuardDecision::RedirectToLogin(format!("{}?callbackUrl={encoded}", self.login_path));
        }

        GuardDecision::Pass
    }
}

/// Middleware applying [`RouteGuard`] to every request.
pub async fn route_guard_middleware(
    State(guard): State<Arc<RouteGuard>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let has_session = cookies::has_any_cookie(request.headers(), &guard.cookie_names);
    let decision = guard.decide(request.uri().path(), request.uri().query(), has_session);

    match decision {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::RedirectToLogin(location) => {
            tracing::debug!(path = %request.uri().path(), "Anonymous request to protected path");
            Redirect::temporary(&location).into_response()
        }
        GuardDecision::RedirectToDashboard(location) => Redirect::temporary(&location).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> RouteGuard {
        RouteGuard::from_config(&AuthConfig::default()).unwrap()
    }

    #[test]
    fn test_protected_paths() {
        let guard = guard();

        assert!(guard.is_protected("/dashboard"));
        assert!(!guard.is_protected("/dashboard-public"));
        assert!(guard.is_protected("/quiz/abc/play"));
        assert!(!guard.is_protected("/quiz/abc/results"));
        assert!(guard.is_protected("/quiz/create"));
        assert!(guard.is_protected("/admin/contacts"));
        assert!(!guard.is_protected("/"));
    }

    #[test]
    fn test_anonymous_redirect_preserves_callback() {
        let decision = guard().decide("/quiz/abc/play", Some("round=2"), false);
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin("/login?callbackUrl=%2Fquiz%2Fabc%2Fplay%3Fround%3D2".into())
        );
    }

    #[test]
    fn test_cookie_presence_passes_protected_path() {
        // Presence only: the guard has no way to know the token is bogus.
        assert_eq!(guard().decide("/dashboard", None, true), GuardDecision::Pass);
    }

    #[test]
    fn test_login_with_session_goes_to_dashboard() {
        let guard = guard();
        assert_eq!(
            guard.decide("/login", None, true),
            GuardDecision::RedirectToDashboard("/dashboard".into())
        );
        assert_eq!(guard.decide("/login", None, false), GuardDecision::Pass);
    }

    #[test]
    fn test_skipped_paths() {
        let guard = guard();
        for path in ["/api/quizzes", "/sitemap.xml", "/robots.txt", "/static/app.css", "/admin/logo.png"] {
            assert_eq!(guard.decide(path, None, false), GuardDecision::Pass, "{path}");
        }
    }
}
