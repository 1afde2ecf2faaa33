//! Administration API access control and moderation.

use axum::http::{Method, StatusCode};
use serde_json::json;

use quizhub::db::{contact, session};

mod common;

#[tokio::test]
async fn test_admin_routes_require_allowlisted_user() {
    let app = common::app().await;
    let (_, player) = app.sign_in("player@quizhub.test").await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;

    assert_eq!(app.get("/api/admin/stats", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.get("/api/admin/stats", Some(&player)).await.status, StatusCode::FORBIDDEN);

    let response = app.get("/api/admin/stats", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["users"], 2);
}

#[test_log::test(tokio::test)]
async fn test_ban_ends_sessions_and_hides_from_rankings() {
    let app = common::app().await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;
    let (player_id, player) = app.sign_in("player@quizhub.test").await;

    let quiz = common::create_quiz(&app, &admin, common::sample_quiz("Banned play", true)).await;
    let answers = json!({ "answers": [{ "questionId": quiz["questions"][0]["id"], "selectedIndices": [1] }] });
    let uri = format!("/api/quizzes/{}/submit", quiz["id"].as_str().unwrap());
    assert_eq!(app.json(Method::POST, &uri, Some(&player), answers).await.status, StatusCode::OK);
    assert_eq!(app.get("/api/rankings", None).await.json().as_array().unwrap().len(), 1);

    let response = app
        .json(Method::PATCH, &format!("/api/admin/users/{player_id}"), Some(&admin), json!({ "banned": true }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["banned"], true);

    assert!(session::Query::find_with_user(&app.db, &player).await.unwrap().is_none());
    assert_eq!(app.get("/api/auth/session", Some(&player)).await.json(), serde_json::Value::Null);
    assert_eq!(app.get("/api/rankings", None).await.json().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_admin_cannot_ban_self() {
    let app = common::app().await;
    let (admin_id, admin) = app.sign_in(common::ADMIN_EMAIL).await;

    let response = app
        .json(Method::PATCH, &format!("/api/admin/users/{admin_id}"), Some(&admin), json!({ "banned": true }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_removes_their_quizzes() {
    let app = common::app().await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;
    let (author_id, author) = app.sign_in("author@quizhub.test").await;
    let quiz = common::create_quiz(&app, &author, common::sample_quiz("Doomed", true)).await;

    let uri = format!("/api/admin/users/{author_id}");
    let response = app.send(common::request(Method::DELETE, &uri, Some(app.session_cookie(&admin)), None)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let quiz_uri = format!("/api/quizzes/{}", quiz["id"].as_str().unwrap());
    assert_eq!(app.get(&quiz_uri, None).await.status, StatusCode::NOT_FOUND);

    let response = app.send(common::request(Method::DELETE, &uri, Some(app.session_cookie(&admin)), None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_moderate_quiz_visibility() {
    let app = common::app().await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;
    let (_, author) = app.sign_in("author@quizhub.test").await;
    let quiz = common::create_quiz(&app, &author, common::sample_quiz("Flagged", true)).await;
    let id = quiz["id"].as_str().unwrap();

    let response = app
        .json(Method::PATCH, &format!("/api/admin/quizzes/{id}"), Some(&admin), json!({ "isPublic": false }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/api/quizzes/{id}"), None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_lifecycle() {
    let app = common::app().await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;

    let response = app
        .json(Method::POST, "/api/admin/categories", Some(&admin), json!({ "name": "World History" }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let created = response.json();
    assert_eq!(created["slug"], "world-history");

    let response = app
        .json(Method::POST, "/api/admin/categories", Some(&admin), json!({ "name": "world history" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["fields"][0]["field"], "name");

    let uri = format!("/api/admin/categories/{}", created["id"].as_str().unwrap());
    let response = app.send(common::request(Method::DELETE, &uri, Some(app.session_cookie(&admin)), None)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/categories/world-history", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_triage() {
    let app = common::app().await;
    let (_, admin) = app.sign_in(common::ADMIN_EMAIL).await;
    let message = contact::Mutation::create(
        &app.db,
        contact::NewContact {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "The timer seems off by one.".into(),
            ip: None,
        },
    )
    .await
    .unwrap();

    let listed = app.get("/api/admin/contacts?status=new", Some(&admin)).await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = app
        .json(
            Method::PATCH,
            &format!("/api/admin/contacts/{}", message.id),
            Some(&admin),
            json!({ "status": "resolved" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "resolved");

    let listed = app.get("/api/admin/contacts?status=new", Some(&admin)).await.json();
    assert_eq!(listed.as_array().unwrap().len(), 0);
}
