//! Integration tests for GET /api/test/{*model}

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use modelgate::{
    config::Config,
    forwarder::probe_payload,
    handlers::{self, AppState},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_app(dir: &TempDir, upstream: &str, api_key: Option<&str>) -> Router {
    let mut config = Config::default();
    config.registry.path = dir.path().join("api_config.json");
    config.upstream.url = upstream.to_string();
    config.upstream.api_key = api_key.map(str::to_string);

    let state = AppState::new(Arc::new(config)).expect("AppState::new should succeed");
    handlers::router(state)
}

async fn probe(app: Router, model: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(format!("/api/test/{}", model))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).expect("Response should be valid JSON"))
}

#[tokio::test]
async fn test_probe_sends_greeting_and_returns_first_choice() {
    let server = MockServer::start().await;
    let upstream_body = json!({
        "choices": [{"message": {"role": "assistant", "content": "Yes, I'm here."}}]
    });
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "openai/gpt-4o-mini",
            "messages": [{"role": "user", "content": "Hello, are you working?"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, &server.uri(), Some("sk-test"));

    let (status, body) = probe(app, "openai/gpt-4o-mini").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "model": "openai/gpt-4o-mini",
            "output": "Yes, I'm here.",
            "raw": upstream_body
        })
    );
}

#[tokio::test]
async fn test_probe_reports_upstream_error_in_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(probe_payload("bogus/model")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"message": "bogus/model is not a valid model ID"}})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, &server.uri(), Some("sk-test"));

    let (status, body) = probe(app, "bogus/model").await;

    assert_eq!(status, StatusCode::OK);
    let output = body["output"].as_str().unwrap();
    assert!(output.starts_with("Error: "), "got: {}", output);
    assert!(output.contains("not a valid model ID"));
    assert_eq!(body["raw"]["error"]["message"], "bogus/model is not a valid model ID");
}

#[tokio::test]
async fn test_probe_transport_failure_returns_500() {
    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, "http://127.0.0.1:1/chat", Some("sk-test"));

    let (status, body) = probe(app, "gpt-x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["type"], "api_error");
}

#[tokio::test]
async fn test_model_test_without_key_returns_400() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, &server.uri(), None);

    let (status, body) = probe(app, "gpt-x").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": {"message": "No OPENROUTER_API_KEY set", "type": "authentication_error"}})
    );
}

#[tokio::test]
async fn test_percent_encoded_model_id_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(probe_payload("vendor/model?v=1#a")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let app = create_test_app(&dir, &server.uri(), Some("sk-test"));

    let (status, body) = probe(app, "vendor/model%3Fv%3D1%23a").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "vendor/model?v=1#a");
    assert_eq!(body["output"], "ok");
}
