//! Shared helpers for API integration tests.
//!
//! `build_test_app` constructs the application router through the same
//! [`build_app_router`] the production binary uses, so tests exercise the
//! full middleware stack (CORS, request ID, timeout, panic recovery).

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use flowdesk_api::config::ServerConfig;
use flowdesk_api::router::build_app_router;
use flowdesk_api::state::AppState;
use flowdesk_engine::{FeedbackClient, ObjectStore, TransformRegistry, WorkflowExecutor};
use flowdesk_store::{MemoryStore, WorkflowStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        workflow_store: "memory".to_string(),
        workflow_base_url: None,
        feedback_sink_url: None,
    }
}

/// Build the full application router over a seeded in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(MemoryStore::seeded()))
}

/// Build the full application router over the given store.
pub fn build_test_app_with(store: Arc<dyn WorkflowStore>) -> Router {
    let config = test_config();

    let http = reqwest::Client::new();
    let objects = Arc::new(ObjectStore::with_prefix("/api/v1/objects/"));
    let executor = Arc::new(WorkflowExecutor::new(
        http.clone(),
        Arc::clone(&objects),
        Arc::new(TransformRegistry::new()),
        None,
    ));

    let state = AppState {
        store,
        executor,
        objects,
        feedback: FeedbackClient::new(http, None),
        config: Arc::new(config.clone()),
        executions: Arc::new(RwLock::new(HashMap::new())),
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a JSON-bodied request to the app.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a DELETE request to the app.
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

/// Assert a `{ "error", "code" }` error envelope with the expected status.
#[allow(dead_code)]
pub async fn assert_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
