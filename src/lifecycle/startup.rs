//! Startup orchestration.
//!
//! # Order
//! 1. HTTP server is built and starts listening
//! 2. Signal handlers are installed (if enabled)
//! 3. The bot connects once, with no overrides
//! 4. Serve until shutdown, then disconnect the bot

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::bot::{BotConnector, ConnectionManager};
use crate::config::{BodyConfig, ConnectionOverrides};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::SharedSink;

/// The composed service: HTTP status endpoint plus one bot connection.
pub struct BodyService<C: BotConnector> {
    config: BodyConfig,
    manager: Arc<ConnectionManager<C>>,
    sink: SharedSink,
    shutdown: Shutdown,
    /// Subscribed at construction so a trigger sent before `run` still stops
    /// the server.
    server_shutdown: broadcast::Receiver<()>,
}

impl<C: BotConnector> BodyService<C> {
    pub fn new(config: BodyConfig, connector: C, sink: SharedSink) -> Self {
        let manager = Arc::new(ConnectionManager::new(
            connector,
            config.bot.clone(),
            sink.clone(),
        ));
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        Self {
            config,
            manager,
            sink,
            shutdown,
            server_shutdown,
        }
    }

    pub fn manager(&self) -> Arc<ConnectionManager<C>> {
        self.manager.clone()
    }

    /// Trigger that stops a running service.
    pub fn shutdown(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serve on `listener` until shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let server = HttpServer::new(&self.config.http, self.sink.clone());

        let addr = listener.local_addr()?;
        self.sink.info("http", format!("Listening on {addr}"));

        if self.config.lifecycle.handle_signals {
            signals::install(self.manager.clone(), self.shutdown.clone());
        }

        if let Err(e) = self.manager.connect(&ConnectionOverrides::default()) {
            tracing::error!(error = %e, "Bot connection not started");
        }

        let served = server.run(listener, self.server_shutdown).await;
        self.manager.disconnect();
        served
    }
}
