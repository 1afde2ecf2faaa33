//! Contact form and its per-IP rate limit.

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use quizhub::db::contact;

mod common;

fn message() -> serde_json::Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "Loving the quizzes, keep them coming!"
    })
}

#[test_log::test(tokio::test)]
async fn test_sixth_submission_in_window_is_rejected() {
    let app = common::app().await;

    for i in 0..5 {
        let response = app.json(Method::POST, "/api/contact", None, message()).await;
        assert_eq!(response.status, StatusCode::CREATED, "submission {i}: {}", response.text());
        assert_eq!(response.json()["success"], true);
    }

    let response = app.json(Method::POST, "/api/contact", None, message()).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.json()["error"], "too_many_requests");

    let retry_after: u64 = response.header(header::RETRY_AFTER).unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry_after), "retry after {retry_after}");

    // Only the accepted submissions were stored.
    let stored = contact::Query::list(&app.db, None).await.unwrap();
    assert_eq!(stored.len(), 5);
    assert_eq!(stored[0].ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_invalid_submission_reports_fields() {
    let app = common::app().await;

    let response = app
        .json(
            Method::POST,
            "/api/contact",
            None,
            json!({ "name": "", "email": "not-an-email", "message": "short" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let body = response.json();
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "message", "name"]);
}

#[tokio::test]
async fn test_rate_limit_can_be_disabled() {
    let mut config = common::test_config();
    config.rate_limit.enabled = false;
    let app = common::app_with(config).await;

    for _ in 0..8 {
        let response = app.json(Method::POST, "/api/contact", None, message()).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }
}
