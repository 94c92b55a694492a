//! HTTP transport tests, driven through the axum router without a socket.

#![cfg(feature = "http")]

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use mcp_gateway::config::GatewayConfig;
use mcp_gateway::protocol::RequestHandler;
use mcp_gateway::transport::HttpTransport;

fn transport() -> HttpTransport {
    let config = GatewayConfig::default().with_simulated_latency(Duration::ZERO);
    HttpTransport::new(RequestHandler::standard(config).unwrap())
}

async fn post_mcp(transport: &HttpTransport, body: &str) -> (StatusCode, String, Vec<u8>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = transport.router().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, bytes.to_vec())
}

async fn get_json(transport: &HttpTransport, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = transport.router().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_post_heartbeat() {
    let (status, content_type, body) =
        post_mcp(&transport(), r#"{"messageType":"heartbeat","requestId":"r1"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "requestId": "r1", "status": "success" }));
}

#[tokio::test]
async fn test_post_protocol_error_is_200() {
    let (status, _, body) =
        post_mcp(&transport(), r#"{"messageType":"bogus","requestId":"r4"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["message"], json!("Unsupported message type: bogus"));
}

#[tokio::test]
async fn test_post_malformed_is_400() {
    let (status, content_type, body) = post_mcp(&transport(), "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(String::from_utf8(body).unwrap(), "Invalid request format");
}

#[tokio::test]
async fn test_post_fault_is_500() {
    let (status, _, body) = post_mcp(
        &transport(),
        r#"{"messageType":"invoke","requestId":"f","invokeRequest":{"operation":"triggerLogicApp","parameters":{"workflowName":42}}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], json!("error"));
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Internal server error: "));
}

#[tokio::test]
async fn test_get_mcp_not_allowed() {
    let request = Request::builder().uri("/mcp").body(Body::empty()).unwrap();
    let response = transport().router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(&transport(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));
    assert_eq!(body["operations"], json!(5));
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = get_json(&transport(), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["openapi"], json!("3.0.1"));
    assert!(body["components"]["schemas"]["McpRequest"].is_object());
}
