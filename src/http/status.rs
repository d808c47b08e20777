//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub ok: bool,
}

/// `GET /status`: always `{"ok": true}`.
pub async fn get_status() -> Json<StatusBody> {
    Json(StatusBody { ok: true })
}
