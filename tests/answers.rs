//! Single-answer checks.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

mod common;

async fn setup() -> (common::TestApp, Value, Value) {
    let app = common::app().await;
    let (_, owner) = app.sign_in("author@quizhub.test").await;
    let quiz = common::create_quiz(&app, &owner, common::sample_quiz("Checked", true)).await;
    let other = common::create_quiz(&app, &owner, common::sample_quiz("Other", true)).await;
    (app, quiz, other)
}

fn check_uri(quiz: &Value) -> String {
    format!("/api/quizzes/{}/check", quiz["id"].as_str().unwrap())
}

#[test_log::test(tokio::test)]
async fn test_correct_and_incorrect_answers() {
    let (app, quiz, _) = setup().await;
    let question = &quiz["questions"][0]["id"];

    let response = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [1] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let verdict = response.json();
    assert_eq!(verdict["correct"], true);
    assert_eq!(verdict["correctIndices"], json!([1]));
    assert_eq!(verdict["explanation"], "Basic arithmetic");

    let response = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [0] }))
        .await;
    assert_eq!(response.json()["correct"], false);
}

#[tokio::test]
async fn test_multi_select_order_does_not_matter() {
    let (app, quiz, _) = setup().await;
    let question = &quiz["questions"][1]["id"];

    let verdict = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [2, 0] }))
        .await
        .json();
    assert_eq!(verdict["correct"], true);

    let verdict = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [0] }))
        .await
        .json();
    assert_eq!(verdict["correct"], false);
}

#[tokio::test]
async fn test_question_from_another_quiz_is_not_found() {
    let (app, quiz, other) = setup().await;
    let foreign = &other["questions"][0]["id"];

    let response = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": foreign, "selectedIndices": [1] }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let body = response.json();
    assert_eq!(body["error"], "not_found");
    assert!(body.get("correct").is_none());
    assert!(body.get("correctIndices").is_none());
}

#[tokio::test]
async fn test_negative_index_is_a_validation_error() {
    let (app, quiz, _) = setup().await;
    let question = &quiz["questions"][0]["id"];

    let response = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [-1] }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["fields"][0]["field"], "selectedIndices");
}

#[tokio::test]
async fn test_out_of_range_index_is_incorrect() {
    let (app, quiz, _) = setup().await;
    let question = &quiz["questions"][0]["id"];

    let response = app
        .json(Method::POST, &check_uri(&quiz), None, json!({ "questionId": question, "selectedIndices": [7] }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["correct"], false);
}
