//! Tests for generation module
//!
//! End-to-end coverage through the router: auth extractor, schema
//! validation, prompt templating, and the inference call against mock
//! upstreams.

use axum::body::Body;
use axum::extract::Extension;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::test_support::{
    firebase_config, huggingface_config, mount_token_endpoint, mount_token_lookup,
    WELL_FORMED_TOKEN,
};
use crate::common::AppState;
use crate::services::{FirebaseService, HuggingFaceService};

const MISTRAL_PATH: &str = "/models/mistralai/Mistral-7B-Instruct-v0.2";
const MIXTRAL_PATH: &str = "/models/mistralai/Mixtral-8x7B-Instruct-v0.1";

async fn test_app(server: &MockServer) -> Router {
    let state = Arc::new(AppState {
        auth_service: Arc::new(FirebaseService::new(firebase_config(server)).unwrap()),
        mistral_service: Arc::new(
            HuggingFaceService::new("mistral", huggingface_config(server)).unwrap(),
        ),
        mixtral_service: Arc::new(
            HuggingFaceService::new("mixtral", huggingface_config(server)).unwrap(),
        ),
    });

    Router::new()
        .merge(crate::auth::auth_routes())
        .merge(crate::generation::generation_routes())
        .layer(Extension(state))
}

fn generation_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {WELL_FORMED_TOKEN}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_generate_requires_bearer_auth() {
    let server = MockServer::start().await;
    let app = test_app(&server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/mistral")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "inputs": "hello" }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_generate_end_to_end_returns_text_and_language() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_token_lookup(&server).await;
    Mock::given(method("POST"))
        .and(path(MISTRAL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "generated_text": "  I'm doing great, thank you for asking!  " }
        ])))
        .mount(&server)
        .await;
    let app = test_app(&server).await;

    let response = app
        .oneshot(generation_request(
            "/mistral",
            json!({ "inputs": "Hello, how are you?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body["generated_text"],
        "I'm doing great, thank you for asking!"
    );
    assert_eq!(body["detected_language"], "en");
    assert!(!body["generated_text"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_mixtral_route_targets_the_mixtral_model() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_token_lookup(&server).await;
    Mock::given(method("POST"))
        .and(path(MIXTRAL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "mixtral says hi" }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server).await;

    let response = app
        .oneshot(generation_request(
            "/mixtral",
            json!({ "inputs": "Hello, how are you?" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["generated_text"], "mixtral says hi");
}

#[tokio::test]
async fn test_generate_rejects_empty_inputs() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_token_lookup(&server).await;
    let app = test_app(&server).await;

    let response = app
        .oneshot(generation_request("/mistral", json!({ "inputs": "   " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_generate_collapses_upstream_failure_to_500() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_token_lookup(&server).await;
    Mock::given(method("POST"))
        .and(path(MISTRAL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad parameters"))
        .mount(&server)
        .await;
    let app = test_app(&server).await;

    let response = app
        .oneshot(generation_request("/mistral", json!({ "inputs": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    // the upstream detail stays server-side
    assert!(!body["error"].as_str().unwrap().contains("bad parameters"));
}

#[tokio::test]
async fn test_generate_retries_cold_start_transparently() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server).await;
    mount_token_lookup(&server).await;
    Mock::given(method("POST"))
        .and(path(MISTRAL_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(MISTRAL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "warm" }])),
        )
        .mount(&server)
        .await;
    let app = test_app(&server).await;

    let response = app
        .oneshot(generation_request("/mistral", json!({ "inputs": "hello" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["generated_text"], "warm");
}
