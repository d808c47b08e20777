//! Metrics collection and exposition.
//!
//! # Metrics
//! - `body_http_requests_total` (counter): requests by method, status
//! - `body_http_request_duration_seconds` (histogram): latency distribution
//! - `body_bot_events_total` (counter): bot lifecycle events by kind
//! - `body_bot_connected` (gauge): 1 while a bot handle is held
//!
//! Without an installed recorder every call is a no-op, so the service and
//! its tests run the same code path whether or not export is enabled.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "body_http_requests_total",
        "method" => method.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "body_http_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a bot lifecycle event.
pub fn record_bot_event(kind: &'static str) {
    counter!("body_bot_events_total", "kind" => kind).increment(1);
}

/// Track whether the manager currently holds a handle.
pub fn set_bot_connected(connected: bool) {
    gauge!("body_bot_connected").set(if connected { 1.0 } else { 0.0 });
}

/// Middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
