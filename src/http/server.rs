//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (`GET /status` plus the 404 fallback)
//! - Wire up middleware (request ID, tracing, metrics, JSON bodies)
//! - Serve on a bound listener until the shutdown signal fires

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::http::middleware::{parse_json_body, BodyParsing};
use crate::http::request::MakeRequestUuid;
use crate::http::response::not_found;
use crate::http::status::get_status;
use crate::observability::{metrics, SharedSink};

/// HTTP status service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &HttpConfig, sink: SharedSink) -> Self {
        Self {
            router: build_router(config, sink),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// Unknown paths hit the router fallback; unknown methods on `/status` hit
/// the method fallback. Both answer the same 404 envelope.
pub fn build_router(config: &HttpConfig, sink: SharedSink) -> Router {
    let body_parsing = BodyParsing {
        sink,
        limit: config.body_limit_bytes,
    };

    Router::new()
        .route("/status", get(get_status).fallback(not_found))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(body_parsing, parse_json_body))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
