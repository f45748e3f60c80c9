//! Integration tests for workflow template CRUD.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{assert_error, body_json, delete, get, send_json};
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /api/v1/workflows lists the seeded catalogue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_seeded_catalogue() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/workflows").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let items = json["data"].as_array().expect("data must be an array");
    assert!(items.len() >= 2, "seeded store has at least two workflows");

    let names: Vec<&str> = items
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"CV Analysis"));
}

// ---------------------------------------------------------------------------
// Test: POST then GET round-trips a workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = common::build_test_app();

    let response = send_json(
        app.clone(),
        "POST",
        "/api/v1/workflows",
        json!({
            "name": "Invoice Checker",
            "description": "Validates uploaded invoices",
            "fields": [
                {"id": "f1", "label": "Invoice", "type": "file", "required": true}
            ],
            "apiConfig": {"endpoint": "http://upstream/check", "method": "POST"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["name"], "Invoice Checker");
    assert_eq!(created["data"]["version"], 1);
    assert_eq!(created["data"]["status"], "available");

    let id = created["data"]["id"].as_str().unwrap();
    let response = get(app, &format!("/api/v1/workflows/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(response).await;
    assert_eq!(fetched["data"], created["data"]);
}

// ---------------------------------------------------------------------------
// Test: PUT merges only present fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_is_a_shallow_merge() {
    let app = common::build_test_app();

    let created = body_json(
        send_json(
            app.clone(),
            "POST",
            "/api/v1/workflows",
            json!({"name": "Before", "description": "keep me"}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = send_json(
        app,
        "PUT",
        &format!("/api/v1/workflows/{id}"),
        json!({"name": "After"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["name"], "After");
    assert_eq!(updated["data"]["description"], "keep me");
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);
}

// ---------------------------------------------------------------------------
// Test: DELETE removes; second DELETE is 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_and_is_not_idempotent() {
    let app = common::build_test_app();

    let created = body_json(
        send_json(
            app.clone(),
            "POST",
            "/api/v1/workflows",
            json!({"name": "Ephemeral"}),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/workflows/{id}");

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app.clone(), &uri).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;

    // Deleting again is an error, not a no-op.
    let response = delete(app, &uri).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Test: invalid create payloads are rejected with 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_rejects_empty_name() {
    let app = common::build_test_app();
    let response = send_json(app, "POST", "/api/v1/workflows", json!({"name": "  "})).await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

#[tokio::test]
async fn create_rejects_contradictory_field_bounds() {
    let app = common::build_test_app();
    let response = send_json(
        app,
        "POST",
        "/api/v1/workflows",
        json!({
            "name": "Bad Bounds",
            "fields": [{
                "id": "f1",
                "label": "Count",
                "type": "number",
                "validation": {"min": 10, "max": 1}
            }]
        }),
    )
    .await;
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR").await;
}

// ---------------------------------------------------------------------------
// Test: unknown id and malformed id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_unknown_id_returns_404() {
    let app = common::build_test_app();
    let response = get(
        app,
        "/api/v1/workflows/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

#[tokio::test]
async fn get_malformed_id_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/workflows/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: unsupported method returns 405 with an Allow header
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_method_returns_405_with_allow() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/v1/workflows")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let allow = response
        .headers()
        .get("allow")
        .expect("405 must carry an Allow header")
        .to_str()
        .unwrap();
    assert!(allow.contains("GET"), "Allow should list GET, got: {allow}");
    assert!(allow.contains("POST"), "Allow should list POST, got: {allow}");
}
