//! Body service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                  BODY SERVICE                 │
//!   HTTP client   │  ┌─────────┐   ┌────────────┐   ┌──────────┐  │
//!   ──────────────┼─▶│ request │──▶│ json body  │──▶│ /status  │  │
//!                 │  │   id    │   │ middleware │   │ 404 else │  │
//!                 │  └─────────┘   └────────────┘   └──────────┘  │
//!                 │                                               │
//!                 │  ┌──────────────┐   ┌─────────────┐           │   Game
//!                 │  │  connection  │──▶│     tcp     │───────────┼─▶ server
//!                 │  │   manager    │◀──│  connector  │  events   │
//!                 │  └──────────────┘   └─────────────┘           │
//!                 │                                               │
//!                 │  config (env) · observability · lifecycle     │
//!                 └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use bot_body::bot::TcpConnector;
use bot_body::config;
use bot_body::lifecycle::BodyService;
use bot_body::observability::{self, TracingSink};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    observability::logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.http.bind_address(),
        mc_host = %config.bot.host,
        mc_port = config.bot.port,
        mc_username = %config.bot.username,
        "Configuration loaded"
    );

    if let Some(addr) = &config.observability.metrics_address {
        // Validated by the loader.
        let addr: SocketAddr = addr.parse()?;
        observability::metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(config.http.bind_address()).await?;

    let connector = TcpConnector::new(tokio::runtime::Handle::current());
    let service = BodyService::new(config, connector, Arc::new(TracingSink));
    service.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
