//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use bot_body::config::HttpConfig;
use bot_body::http::build_router;
use bot_body::observability::RecordingSink;
use serde_json::Value;
use tower::ServiceExt;

/// Router wired to a recording sink.
pub fn test_router() -> (Router, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let router = build_router(&HttpConfig::default(), sink.clone());
    (router, sink)
}

/// Send one request through `router`, returning status, headers and the
/// body parsed as JSON (`Value::Null` for an empty body).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, json)
}

#[allow(dead_code)]
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn request_with_body(
    method: &str,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(body.into())
        .unwrap()
}
