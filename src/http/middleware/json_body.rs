//! JSON body middleware.
//!
//! Parses JSON request bodies up front and attaches the value as a
//! [`JsonBody`] extension. Content-type checking is lenient: a POST, PUT or
//! PATCH that declares some other content type only produces a warning
//! diagnostic, and the request goes on untouched.

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_LENGTH, header::CONTENT_TYPE, HeaderMap, Method, Request},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::http::response::ApiError;
use crate::observability::SharedSink;

const SOURCE: &str = "http";

/// Parsed JSON body, available to handlers via `Extension<JsonBody>`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

/// Middleware state.
#[derive(Clone)]
pub struct BodyParsing {
    pub sink: SharedSink,
    pub limit: usize,
}

pub async fn parse_json_body(
    State(state): State<BodyParsing>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let has_body_method = matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::PATCH
    );
    if has_body_method {
        if let Some(ct) = content_type.as_deref().filter(|ct| !is_json(ct)) {
            state
                .sink
                .warn(SOURCE, format!("Unexpected Content-Type: {ct}"));
        }
    }

    if !content_type.as_deref().is_some_and(is_json) {
        return Ok(next.run(request).await);
    }

    if declared_length(request.headers()).is_some_and(|len| len > state.limit) {
        return Err(ApiError::PayloadTooLarge { limit: state.limit });
    }

    let (parts, body) = request.into_parts();
    // Fails on the length limit or a broken body stream; neither leaves a
    // body worth parsing.
    let bytes = axum::body::to_bytes(body, state.limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge { limit: state.limit })?;

    let parsed = if bytes.is_empty() {
        None
    } else {
        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
        Some(JsonBody(value))
    };

    let mut request = Request::from_parts(parts, Body::from(bytes));
    if let Some(json) = parsed {
        request.extensions_mut().insert(json);
    }
    Ok(next.run(request).await)
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}
