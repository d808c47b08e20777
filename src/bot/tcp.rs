//! TCP transport connector.
//!
//! Opens the socket to the game server on the tokio runtime and reports the
//! socket lifecycle: `error` when connecting or reading fails, `end` when the
//! peer closes or a quit is requested. Login and play traffic are the game
//! client's business, so this transport never reports `spawn` or `kicked`.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use crate::bot::client::{BotConnector, BotEvent, BotHandle, EventDispatcher, EventKind, EventObserver};
use crate::config::ConnectionConfig;

pub const REASON_QUIT: &str = "quit requested";
pub const REASON_SOCKET_CLOSED: &str = "socket closed";

/// Connector spawning one session task per handle.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    runtime: Handle,
}

impl TcpConnector {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl BotConnector for TcpConnector {
    type Handle = TcpHandle;

    fn open(&self, config: &ConnectionConfig) -> Arc<TcpHandle> {
        let handle = Arc::new(TcpHandle {
            peer: format!("{}:{}", config.host, config.port),
            events: Arc::new(EventDispatcher::new()),
            quit: Arc::new(Notify::new()),
        });

        self.runtime.spawn(session(
            config.clone(),
            handle.events.clone(),
            handle.quit.clone(),
        ));

        handle
    }
}

/// Handle for a TCP session.
#[derive(Debug)]
pub struct TcpHandle {
    peer: String,
    events: Arc<EventDispatcher>,
    quit: Arc<Notify>,
}

impl TcpHandle {
    /// `host:port` this handle connects to.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl BotHandle for TcpHandle {
    fn subscribe(&self, kind: EventKind, observer: EventObserver) {
        self.events.subscribe(kind, observer);
    }

    fn quit(&self) {
        // notify_one stores a permit, so a quit issued before the session
        // starts waiting is not lost.
        self.quit.notify_one();
    }
}

async fn session(config: ConnectionConfig, events: Arc<EventDispatcher>, quit: Arc<Notify>) {
    let connect = TcpStream::connect((config.host.as_str(), config.port));

    let mut stream = tokio::select! {
        result = connect => match result {
            Ok(stream) => stream,
            Err(e) => {
                tracing::debug!(host = %config.host, port = config.port, error = %e, "TCP connect failed");
                events.dispatch(BotEvent::Error { message: e.to_string() });
                events.dispatch(BotEvent::End { reason: REASON_SOCKET_CLOSED.to_string() });
                return;
            }
        },
        _ = quit.notified() => {
            events.dispatch(BotEvent::End { reason: REASON_QUIT.to_string() });
            return;
        }
    };

    tracing::debug!(host = %config.host, port = config.port, "TCP connection established");

    let mut buf = vec![0u8; 4096];
    loop {
        tokio::select! {
            read = stream.read(&mut buf) => match read {
                Ok(0) => {
                    events.dispatch(BotEvent::End { reason: REASON_SOCKET_CLOSED.to_string() });
                    break;
                }
                Ok(_) => continue,
                Err(e) => {
                    events.dispatch(BotEvent::Error { message: e.to_string() });
                    events.dispatch(BotEvent::End { reason: REASON_SOCKET_CLOSED.to_string() });
                    break;
                }
            },
            _ = quit.notified() => {
                let _ = stream.shutdown().await;
                events.dispatch(BotEvent::End { reason: REASON_QUIT.to_string() });
                break;
            }
        }
    }
}
