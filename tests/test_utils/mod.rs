//! Test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::sync::{Arc, RwLock};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tempfile::TempDir;
use tower::util::ServiceExt;

use tutor::api::AppState;
use tutor::api::app;
use tutor::core::{AppConfig, ProblemCatalog};
use tutor::report::LogMailer;

pub const PROBLEMS: &str = r#"[
  {
    "id": "KIN-01",
    "category": "Kinematics: Projectile",
    "statement": "A ball is kicked at 20 m/s and 30 degrees. Find the horizontal and vertical velocity components.",
    "targets": {"Vx": 17.32, "Vy": 10.0}
  },
  {
    "id": "KIN-02",
    "category": "Kinematics: Rest",
    "statement": "A block starts from rest. What is its initial velocity?",
    "targets": {"V0": 0.0}
  },
  {
    "id": "DYN-01",
    "category": "Dynamics",
    "statement": "Discuss Newton's second law.",
    "targets": {}
  }
]"#;

/// Creates a test application router backed by a temporary problems
/// file. The LLM host points at `llm_url`, usually a mockito server.
pub fn test_app_with_llm(llm_url: &str) -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let problems_path = dir.path().join("problems.json");
    fs::write(&problems_path, PROBLEMS).expect("Failed to write problems");
    let static_path = dir.path().join("web-ui");
    fs::create_dir_all(&static_path).expect("Failed to create static dir");
    fs::write(static_path.join("index.html"), "<html>tutor</html>")
        .expect("Failed to write index");

    let config = AppConfig {
        problems_path: problems_path.display().to_string(),
        static_path: static_path.display().to_string(),
        openai_model: String::from("gpt-4.1-mini"),
        openai_api_hostname: llm_url.to_string(),
        openai_api_key: String::from("test-api-key"),
        tolerance: 0.05,
        mail_relay_url: None,
        email_sender: String::from("tutor@test"),
        email_receiver: String::from("prof@test"),
        session_idle_minutes: 120,
    };
    let problems = ProblemCatalog::load(&config.problems_path).expect("Failed to load problems");
    let app_state = AppState::new(config, problems, Arc::new(LogMailer));
    (app(Arc::new(RwLock::new(app_state))), dir)
}

/// Creates a test application whose LLM host is unreachable. Good
/// for anything that doesn't talk to the model.
pub fn test_app() -> (Router, TempDir) {
    test_app_with_llm("http://127.0.0.1:9")
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}

/// A canned chat completion response containing `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Starts a session for `user_name` and returns its ID
pub async fn create_session(app: &Router, user_name: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/sessions",
            serde_json::json!({"user_name": user_name}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    body["id"].as_str().unwrap().to_string()
}
