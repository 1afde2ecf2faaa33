//! Minimal server-rendered pages for the sign-in flow.

use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::OptionalUser;
use crate::http::error::ApiError;
use crate::http::server::AppState;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{} | QuizHub</title></head>\
         <body><main>{body}</main></body></html>",
        escape(title)
    ))
}

pub async fn home() -> Html<String> {
    page(
        "Home",
        "<h1>QuizHub</h1><p><a href=\"/api/quizzes\">Browse quizzes</a> | <a href=\"/login\">Sign in</a></p>",
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    pub callback_url: Option<String>,
    pub error: Option<String>,
}

pub async fn login(State(state): State<AppState>, Query(params): Query<LoginParams>) -> Html<String> {
    let callback: String = params
        .callback_url
        .as_deref()
        .map(|c| url::form_urlencoded::byte_serialize(c.as_bytes()).collect())
        .unwrap_or_default();

    let mut body = String::from("<h1>Sign in</h1>");
    if let Some(error) = &params.error {
        body.push_str(&format!("<p role=\"alert\">Sign-in failed ({}).</p>", escape(error)));
    }
    body.push_str("<ul>");
    for provider in &state.config.auth.providers {
        body.push_str(&format!(
            "<li><a href=\"/api/auth/signin/{}?callbackUrl={}\">Continue with {}</a></li>",
            escape(&provider.name),
            escape(&callback),
            escape(provider.label())
        ));
    }
    body.push_str("</ul>");
    page("Sign in", &body)
}

/// The guard only saw a cookie; the session is verified here.
pub async fn dashboard(State(state): State<AppState>, viewer: OptionalUser) -> Response {
    let Some(current) = viewer.0 else {
        let login = format!("{}?callbackUrl=%2Fdashboard", state.config.auth.login_path);
        return Redirect::temporary(&login).into_response();
    };

    let name = current.user.name.as_deref().unwrap_or(&current.user.email);
    let mut body = format!("<h1>Welcome, {}</h1><ul>", escape(name));
    body.push_str("<li><a href=\"/api/users/me/quizzes\">My quizzes</a></li>");
    body.push_str("<li><a href=\"/api/users/me/scores\">My scores</a></li>");
    if current.is_admin {
        body.push_str("<li><a href=\"/api/admin/stats\">Administration</a></li>");
    }
    body.push_str("</ul><form method=\"post\" action=\"/api/auth/signout\"><button>Sign out</button></form>");
    page("Dashboard", &body).into_response()
}

pub async fn not_found(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        return ApiError::NotFound("route").into_response();
    }
    (StatusCode::NOT_FOUND, page("Not found", "<h1>Page not found</h1>")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"Tom\" & 'Jerry'</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }
}
