// tests/session_tests.rs

mod common;

use std::time::Duration;

use common::{Reply, ScriptedCompletion, TestApp, photosynthesis_quiz, spawn_app, spawn_app_with};
use notes_quiz::config::Config;
use serde_json::{Value, json};

async fn open_session(app: &TestApp, class_id: &str) -> String {
    let resp = app
        .client
        .post(app.url(&format!("/api/classes/{}/quiz-sessions", class_id)))
        .send()
        .await
        .expect("Failed to open session");
    assert_eq!(resp.status().as_u16(), 201);
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["status"], "empty");
    view["id"].as_str().unwrap().to_string()
}

async fn generate(app: &TestApp, session_id: &str) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/quiz-sessions/{}/generate", session_id)))
        .send()
        .await
        .expect("Failed to generate")
}

async fn select(app: &TestApp, session_id: &str, question: usize, option: usize) -> u16 {
    app.client
        .put(app.url(&format!("/api/quiz-sessions/{}/answers", session_id)))
        .json(&json!({ "question_index": question, "option_index": option }))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

async fn finalize(app: &TestApp, session_id: &str) -> reqwest::Response {
    app.client
        .post(app.url(&format!("/api/quiz-sessions/{}/finalize", session_id)))
        .send()
        .await
        .unwrap()
}

async fn session_view(app: &TestApp, session_id: &str) -> Value {
    app.client
        .get(app.url(&format!("/api/quiz-sessions/{}", session_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn photosynthesis_quiz_end_to_end() {
    // Arrange
    let model = ScriptedCompletion::new(vec![Reply::Text(photosynthesis_quiz())]);
    let app = spawn_app(model.clone()).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Photosynthesis converts light to energy.").await;

    // Generate
    let session_id = open_session(&app, &class_id).await;
    let resp = generate(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 200);
    let view: Value = resp.json().await.unwrap();
    assert_eq!(view["status"], "ready");
    assert_eq!(view["questions"].as_array().unwrap().len(), 2);
    assert!(view["questions"][0].get("correct_answer").is_none());
    assert!(model.requests()[0]
        .prompt
        .contains("Photosynthesis converts light to energy."));

    // Answer: first correct, second wrong
    assert_eq!(select(&app, &session_id, 0, 0).await, 200);
    assert_eq!(select(&app, &session_id, 1, 1).await, 200);

    // Finalize
    let resp = finalize(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 200);
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["score"], 1);
    assert_eq!(outcome["total"], 2);
    assert_eq!(outcome["percentage"], 50);
    assert_eq!(outcome["saved"], true);
    assert_eq!(outcome["records"][1]["userAnswer"], "Carbon dioxide");
    assert_eq!(outcome["records"][1]["correctAnswer"], "Oxygen");
    assert_eq!(
        outcome["questions"][0]["explanation"],
        "Light energy becomes chemical energy."
    );

    // The stored result matches
    let history: Vec<Value> = app
        .client
        .get(app.url(&format!("/api/classes/{}/quiz-results", class_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["score"], 1);
    assert_eq!(history[0]["total_questions"], 2);
    assert_eq!(history[0]["id"], outcome["result_id"]);

    // The session is discarded after finalize
    let resp = finalize(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn completion_timeout_returns_session_to_empty() {
    let model = ScriptedCompletion::new(vec![Reply::Hang]);
    let config = Config {
        completion_timeout: Duration::from_millis(200),
        ..Config::for_tests()
    };
    let app = spawn_app_with(model, config).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Photosynthesis converts light to energy.").await;
    let session_id = open_session(&app, &class_id).await;

    let resp = generate(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 500);

    let view = session_view(&app, &session_id).await;
    assert_eq!(view["status"], "empty");
    assert!(view["last_error"].is_string());
    assert!(view["questions"].as_array().unwrap().is_empty());

    // Nothing can be finalized, and nothing was stored
    let resp = finalize(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 409);
    let history: Vec<Value> = app
        .client
        .get(app.url("/api/quiz-results"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    let model = ScriptedCompletion::new(vec![
        Reply::Fail("503 from provider".to_string()),
        Reply::Text(photosynthesis_quiz()),
    ]);
    let app = spawn_app(model).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Plants release oxygen.").await;
    let session_id = open_session(&app, &class_id).await;

    assert_eq!(generate(&app, &session_id).await.status().as_u16(), 500);
    assert_eq!(generate(&app, &session_id).await.status().as_u16(), 200);
    assert_eq!(session_view(&app, &session_id).await["status"], "ready");
}

#[tokio::test]
async fn finalize_requires_every_answer() {
    let model = ScriptedCompletion::new(vec![Reply::Text(photosynthesis_quiz())]);
    let app = spawn_app(model).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Photosynthesis converts light to energy.").await;
    let session_id = open_session(&app, &class_id).await;
    generate(&app, &session_id).await;

    assert_eq!(select(&app, &session_id, 0, 0).await, 200);

    let resp = finalize(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 422);

    let view = session_view(&app, &session_id).await;
    assert_eq!(view["status"], "ready");
    assert_eq!(view["selections"]["0"], 0);
}

#[tokio::test]
async fn out_of_range_selection_is_rejected() {
    let model = ScriptedCompletion::new(vec![Reply::Text(photosynthesis_quiz())]);
    let app = spawn_app(model).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Notes").await;
    let session_id = open_session(&app, &class_id).await;
    generate(&app, &session_id).await;

    assert_eq!(select(&app, &session_id, 5, 0).await, 400);
    assert_eq!(select(&app, &session_id, 0, 9).await, 400);
}

#[tokio::test]
async fn regenerate_discards_selections() {
    let model = ScriptedCompletion::new(vec![
        Reply::Text(photosynthesis_quiz()),
        Reply::Text(photosynthesis_quiz()),
    ]);
    let app = spawn_app(model).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Notes").await;
    let session_id = open_session(&app, &class_id).await;

    generate(&app, &session_id).await;
    select(&app, &session_id, 0, 0).await;
    let resp = generate(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 200);

    let view = session_view(&app, &session_id).await;
    assert!(view["selections"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn generate_without_notes_is_400() {
    let model = ScriptedCompletion::new(vec![]);
    let app = spawn_app(model.clone()).await;
    let class_id = app.create_class("Empty").await;
    let session_id = open_session(&app, &class_id).await;

    let resp = generate(&app, &session_id).await;
    assert_eq!(resp.status().as_u16(), 400);
    assert!(model.requests().is_empty());
    assert_eq!(session_view(&app, &session_id).await["status"], "empty");
}

#[tokio::test]
async fn score_survives_storage_outage() {
    let model = ScriptedCompletion::new(vec![Reply::Text(photosynthesis_quiz())]);
    let app = spawn_app(model).await;
    let class_id = app.create_class("Biology").await;
    app.add_note(&class_id, "Notes").await;
    let session_id = open_session(&app, &class_id).await;
    generate(&app, &session_id).await;
    select(&app, &session_id, 0, 0).await;
    select(&app, &session_id, 1, 2).await;

    app.store.set_available(false);
    let resp = finalize(&app, &session_id).await;
    app.store.set_available(true);

    assert_eq!(resp.status().as_u16(), 200);
    let outcome: Value = resp.json().await.unwrap();
    assert_eq!(outcome["score"], 2);
    assert_eq!(outcome["percentage"], 100);
    assert_eq!(outcome["saved"], false);
    assert!(outcome["result_id"].is_null());
}

#[tokio::test]
async fn session_for_unknown_class_is_404() {
    let app = spawn_app(ScriptedCompletion::new(vec![])).await;

    let resp = app
        .client
        .post(app.url(&format!("/api/classes/{}/quiz-sessions", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn cancelled_session_is_gone() {
    let app = spawn_app(ScriptedCompletion::new(vec![])).await;
    let class_id = app.create_class("Biology").await;
    let session_id = open_session(&app, &class_id).await;

    let resp = app
        .client
        .delete(app.url(&format!("/api/quiz-sessions/{}", session_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = app
        .client
        .get(app.url(&format!("/api/quiz-sessions/{}", session_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}
