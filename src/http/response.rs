//! Response envelopes.
//!
//! Every error leaves the service as
//! `{"success": false, "error": {"code": ..., "message": ...}}`.

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Clone)]
pub enum ApiError {
    NotFound { method: Method, path: String },
    InvalidJson(String),
    PayloadTooLarge { limit: usize },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::NotFound { method, path } => format!("Route {method} {path} not found"),
            ApiError::InvalidJson(detail) => format!("Request body is not valid JSON: {detail}"),
            ApiError::PayloadTooLarge { limit } => {
                format!("Request body exceeds {limit} bytes")
            }
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            success: false,
            error: ErrorDetail {
                code: self.code(),
                message: self.message(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

/// Fallback for every unmatched method and path.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method,
        path: uri.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_uses_method_and_path() {
        let err = ApiError::NotFound {
            method: Method::DELETE,
            path: "/bots/1".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let json = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": {"code": "NOT_FOUND", "message": "Route DELETE /bots/1 not found"}
            })
        );
    }

    #[test]
    fn body_errors_map_to_client_statuses() {
        assert_eq!(
            ApiError::InvalidJson("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        let too_large = ApiError::PayloadTooLarge { limit: 10 };
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(too_large.code(), "PAYLOAD_TOO_LARGE");
    }
}
