use super::mocks::MockLlmClient;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use concierge_relay::{
    catalog::ServiceCatalog,
    config::{Config, LlmConfig, ServerConfig},
    llm::{GenerateContentResponse, LlmClient},
    relay::{Relay, build_instruction},
    server::{self, handlers::AppState},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

pub const SALON_ORIGIN: &str = "https://douda-beauty-and-willness.web.app";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            ..ServerConfig::default()
        },
        llm: LlmConfig {
            api_key: Some("test-api-key".to_string()),
            model: "gemini-test".to_string(),
            ..LlmConfig::default()
        },
        ..Config::default()
    }
}

/// The instruction block built from the default persona and bundled catalog.
pub fn test_instruction() -> String {
    let config = create_test_config();
    build_instruction(&config.persona, &ServiceCatalog::bundled().unwrap())
}

/// A well-formed upstream reply carrying `text` in its first candidate.
pub fn text_response(text: &str) -> GenerateContentResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .unwrap()
}

pub fn create_relay(client: Option<Arc<MockLlmClient>>) -> Relay {
    let client = client.map(|c| c as Arc<dyn LlmClient>);
    Relay::new(client, test_instruction())
}

pub fn create_test_app(client: Option<Arc<MockLlmClient>>) -> Router {
    create_test_app_with(&create_test_config().server, create_relay(client))
}

pub fn create_test_app_with(config: &ServerConfig, relay: Relay) -> Router {
    server::router(config, AppState { relay }).unwrap()
}

pub fn chat_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Sends `request` through `app`; returns the status and the JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    send(app, chat_request(body.to_string())).await
}
