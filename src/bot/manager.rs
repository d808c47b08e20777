//! Bot connection manager.
//!
//! # States
//! ```text
//! Unconnected → connect() → Connecting
//! Connecting  → spawn → Connected
//! Connecting | Connected → end | kicked | error → Disconnected
//! any state holding a handle → disconnect() → Unconnected
//! ```
//!
//! There is no automatic reconnection. A second `connect()` closes the
//! handle it replaces.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::bot::client::{BotConnector, BotEvent, BotHandle, EventKind};
use crate::config::validation::{validate_connection, ValidationError};
use crate::config::{ConnectionConfig, ConnectionOverrides};
use crate::observability::metrics;
use crate::observability::SharedSink;

const SOURCE: &str = "bot";

/// Error type for manager operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid connection configuration: {}", describe(.0))]
    InvalidConfig(Vec<ValidationError>),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lifecycle state as observed by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Unconnected,
    Connecting,
    Connected,
    Disconnected,
}

/// State plus the generation of the handle it belongs to.
///
/// Observers of a replaced or disconnected handle carry a stale generation
/// and cannot overwrite the state of the current one.
#[derive(Debug)]
struct StateCell {
    inner: Mutex<(u64, ConnectionState)>,
}

impl StateCell {
    fn new() -> Self {
        Self {
            inner: Mutex::new((0, ConnectionState::Unconnected)),
        }
    }

    fn advance(&self, state: ConnectionState) -> u64 {
        let mut inner = self.lock();
        inner.0 += 1;
        inner.1 = state;
        inner.0
    }

    fn update_if_current(&self, generation: u64, state: ConnectionState) {
        let mut inner = self.lock();
        if inner.0 == generation {
            inner.1 = state;
        }
    }

    fn get(&self) -> ConnectionState {
        self.lock().1
    }

    fn lock(&self) -> MutexGuard<'_, (u64, ConnectionState)> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Owns at most one connection handle to a game server.
pub struct ConnectionManager<C: BotConnector> {
    connector: C,
    /// Environment-derived configuration; overrides are merged on top.
    base: ConnectionConfig,
    sink: SharedSink,
    slot: Mutex<Option<Arc<C::Handle>>>,
    state: Arc<StateCell>,
}

impl<C: BotConnector> ConnectionManager<C> {
    pub fn new(connector: C, base: ConnectionConfig, sink: SharedSink) -> Self {
        Self {
            connector,
            base,
            sink,
            slot: Mutex::new(None),
            state: Arc::new(StateCell::new()),
        }
    }

    /// Open a new connection with `overrides` applied over the base config.
    ///
    /// Returns as soon as the connector hands back a handle; the connection
    /// completes (or fails) later and is reported through the registered
    /// observers. A handle that is already held is closed first.
    pub fn connect(&self, overrides: &ConnectionOverrides) -> Result<Arc<C::Handle>, BotError> {
        let config = self.base.merged(overrides);
        validate_connection(&config).map_err(BotError::InvalidConfig)?;

        let mut slot = self.lock_slot();
        if let Some(previous) = slot.take() {
            self.sink
                .info(SOURCE, "Closing previous connection before reconnecting".to_string());
            previous.quit();
        }

        self.sink.info(
            SOURCE,
            format!(
                "Connecting to {}:{} as \"{}\"...",
                config.host, config.port, config.username
            ),
        );

        let generation = self.state.advance(ConnectionState::Connecting);
        let handle = self.connector.open(&config);
        self.register_observers(handle.as_ref(), generation);

        *slot = Some(handle.clone());
        metrics::set_bot_connected(true);
        Ok(handle)
    }

    /// The handle produced by the most recent `connect`, if still held.
    pub fn handle(&self) -> Option<Arc<C::Handle>> {
        self.lock_slot().clone()
    }

    /// Close the held connection, if any. Never fails.
    pub fn disconnect(&self) {
        let Some(handle) = self.lock_slot().take() else {
            return;
        };
        self.sink.info(SOURCE, "Disconnecting...".to_string());
        self.state.advance(ConnectionState::Unconnected);
        handle.quit();
        metrics::set_bot_connected(false);
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn is_connected(&self) -> bool {
        self.lock_slot().is_some()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Spawn is observed once per handle; respawns are ignored.
    fn register_observers(&self, handle: &C::Handle, generation: u64) {
        for kind in EventKind::ALL {
            let sink = self.sink.clone();
            let state = self.state.clone();
            let fired = AtomicBool::new(false);
            handle.subscribe(
                kind,
                Arc::new(move |event: &BotEvent| {
                    if kind == EventKind::Spawn && fired.swap(true, Ordering::SeqCst) {
                        return;
                    }
                    metrics::record_bot_event(event.kind().as_str());
                    report(sink.as_ref(), event);
                    let next = match event {
                        BotEvent::Spawn { .. } => ConnectionState::Connected,
                        _ => ConnectionState::Disconnected,
                    };
                    state.update_if_current(generation, next);
                }),
            );
        }
    }

    fn lock_slot(&self) -> MutexGuard<'_, Option<Arc<C::Handle>>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: BotConnector> fmt::Debug for ConnectionManager<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("base", &self.base)
            .field("state", &self.state())
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Write the diagnostics for one lifecycle event.
fn report(sink: &dyn crate::observability::DiagnosticSink, event: &BotEvent) {
    match event {
        BotEvent::Spawn {
            position,
            health,
            food,
        } => {
            sink.info(SOURCE, "Spawned in world".to_string());
            sink.info(SOURCE, format!("Position: {position}"));
            sink.info(SOURCE, format!("Health: {health}, Food: {food}"));
        }
        BotEvent::End { reason } => {
            sink.info(SOURCE, format!("Disconnected: {reason}"));
        }
        BotEvent::Kicked { reason, logged_in } => {
            sink.info(SOURCE, format!("Kicked: {reason} (loggedIn: {logged_in})"));
        }
        BotEvent::Error { message } => {
            sink.error(SOURCE, format!("Error: {message}"));
        }
    }
}
