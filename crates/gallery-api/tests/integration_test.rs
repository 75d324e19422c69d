//! Integration tests for Genboard API

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use genboard_api::{create_router, AppState};
use genboard_gallery::{ArtifactKind, CollectionStore, GatewayFailure, GenerationGateway, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// Answers every prompt except "explode"
struct StubGateway;

#[async_trait]
impl<K: ArtifactKind> GenerationGateway<K> for StubGateway {
    async fn generate(&self, prompt: &str, _options: &K::Options) -> Result<String, GatewayFailure> {
        if prompt == "explode" {
            return Err(GatewayFailure::new("Model overloaded"));
        }

        Ok(format!("generated: {}", prompt))
    }
}

/// Helper to create test app over an in-memory store
async fn create_test_app() -> Router {
    let store = CollectionStore::new(Arc::new(MemoryStore::new()));
    let state = AppState::open(Arc::new(StubGateway), store).await;

    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let (status, json) = send_json(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "genboard");
}

#[tokio::test]
async fn test_generate_and_list_images() {
    let app = create_test_app().await;

    let (status, first) = send_json(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({"prompt": "  A lighthouse in fog  "})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["prompt"], "A lighthouse in fog");
    assert_eq!(first["url"], "generated: A lighthouse in fog");
    assert!(first["createdAt"].is_string());

    send_json(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({"prompt": "A red fox"})),
    )
    .await;

    let (status, list) = send_json(&app, Method::GET, "/api/images", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["generating"], false);

    let images = list["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["prompt"], "A red fox");
    assert_eq!(images[1]["id"], first["id"]);
    assert_eq!(images[0]["contentState"], "loading");
}

#[tokio::test]
async fn test_blank_prompt_is_rejected() {
    let app = create_test_app().await;

    let (status, json) = send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "   ", "type": "casual"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Please enter a prompt");

    let (_, list) = send_json(&app, Method::GET, "/api/texts", None).await;
    assert!(list["texts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_gateway_failure_is_bad_gateway() {
    let app = create_test_app().await;

    let (status, json) = send_json(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({"prompt": "explode"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "Model overloaded");

    let (_, list) = send_json(&app, Method::GET, "/api/images", None).await;
    assert_eq!(list["generating"], false);
    assert!(list["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_text_defaults_to_creative() {
    let app = create_test_app().await;

    let (status, text) = send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "Write a short story"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text["type"], "creative");
    assert_eq!(text["text"], "generated: Write a short story");
}

#[tokio::test]
async fn test_remove_and_clear() {
    let app = create_test_app().await;

    let (_, first) = send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "One", "type": "professional"})),
    )
    .await;
    send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "Two", "type": "marketing"})),
    )
    .await;

    let uri = format!("/api/texts/{}", first["id"].as_str().unwrap());
    let (status, json) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], true);

    let (_, json) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(json["removed"], false);

    let (_, list) = send_json(&app, Method::GET, "/api/texts", None).await;
    assert_eq!(list["texts"].as_array().unwrap().len(), 1);
    assert_eq!(list["texts"][0]["prompt"], "Two");

    let (status, _) = send_json(&app, Method::DELETE, "/api/texts", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send_json(&app, Method::GET, "/api/texts", None).await;
    assert!(list["texts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_regenerate_adds_a_new_entry() {
    let app = create_test_app().await;

    let (_, original) = send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "Write a short story", "type": "creative"})),
    )
    .await;

    let uri = format!("/api/texts/{}/regenerate", original["id"].as_str().unwrap());
    let (status, again) = send_json(&app, Method::POST, &uri, None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(again["prompt"], "Write a short story");
    assert_eq!(again["type"], "creative");
    assert_ne!(again["id"], original["id"]);

    let (_, list) = send_json(&app, Method::GET, "/api/texts", None).await;
    assert_eq!(list["texts"].as_array().unwrap().len(), 2);
    assert_eq!(list["texts"][0]["id"], again["id"]);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = create_test_app().await;

    let (status, json) = send_json(&app, Method::POST, "/api/images/missing/regenerate", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("missing"));

    let (status, _) = send_json(&app, Method::GET, "/api/texts/missing/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/images/missing/content",
        Some(json!({"status": "loaded"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_image_content_reports() {
    let app = create_test_app().await;

    let (_, loaded) = send_json(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({"prompt": "Loads fine"})),
    )
    .await;
    let (_, broken) = send_json(
        &app,
        Method::POST,
        "/api/images",
        Some(json!({"prompt": "Never loads"})),
    )
    .await;

    let uri = format!("/api/images/{}/content", loaded["id"].as_str().unwrap());
    let (status, _) = send_json(&app, Method::POST, &uri, Some(json!({"status": "loaded"}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let uri = format!("/api/images/{}/content", broken["id"].as_str().unwrap());
    let (status, _) = send_json(&app, Method::POST, &uri, Some(json!({"status": "errored"}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send_json(&app, Method::GET, "/api/images", None).await;
    assert_eq!(list["images"][0]["prompt"], "Never loads");
    assert_eq!(list["images"][0]["contentState"], "errored");
    assert_eq!(list["images"][1]["contentState"], "ready");
}

#[tokio::test]
async fn test_text_export_is_an_attachment() {
    let app = create_test_app().await;

    let (_, text) = send_json(
        &app,
        Method::POST,
        "/api/texts",
        Some(json!({"prompt": "Ode: to Rust!", "type": "casual"})),
    )
    .await;

    let uri = format!("/api/texts/{}/export", text["id"].as_str().unwrap());
    let request = Request::builder().uri(&uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );

    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"ode-to-rust-"));
    assert!(disposition.ends_with(".txt\""));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"generated: Ode: to Rust!");
}

#[tokio::test]
async fn test_tab_preference() {
    let app = create_test_app().await;

    let (status, json) = send_json(&app, Method::GET, "/api/tab", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tab"], "image");

    let (status, _) = send_json(&app, Method::PUT, "/api/tab", Some(json!({"tab": "text"}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send_json(&app, Method::GET, "/api/tab", None).await;
    assert_eq!(json["tab"], "text");
}
