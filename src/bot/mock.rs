//! In-memory connector.
//!
//! Records every `open` and `quit` and lets callers inject lifecycle events
//! by hand. Used by the test suites and for running the service without a
//! game server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::bot::client::{BotConnector, BotEvent, BotHandle, EventDispatcher, EventKind, EventObserver};
use crate::config::ConnectionConfig;

/// Connector that never touches the network.
#[derive(Debug, Default)]
pub struct MockConnector {
    handles: Mutex<Vec<Arc<MockHandle>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configurations passed to `open`, oldest first.
    pub fn opened(&self) -> Vec<ConnectionConfig> {
        self.lock().iter().map(|h| h.config.clone()).collect()
    }

    /// Handles produced so far, oldest first.
    pub fn handles(&self) -> Vec<Arc<MockHandle>> {
        self.lock().clone()
    }

    pub fn last_handle(&self) -> Option<Arc<MockHandle>> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<MockHandle>>> {
        self.handles.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BotConnector for MockConnector {
    type Handle = MockHandle;

    fn open(&self, config: &ConnectionConfig) -> Arc<MockHandle> {
        let handle = Arc::new(MockHandle::new(config.clone()));
        self.lock().push(handle.clone());
        handle
    }
}

/// Handle returned by [`MockConnector`].
#[derive(Debug)]
pub struct MockHandle {
    config: ConnectionConfig,
    events: EventDispatcher,
    subscriptions: Mutex<HashMap<EventKind, usize>>,
    quits: AtomicUsize,
}

impl MockHandle {
    fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            events: EventDispatcher::new(),
            subscriptions: Mutex::new(HashMap::new()),
            quits: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Deliver `event` to the registered observers.
    pub fn emit(&self, event: BotEvent) {
        self.events.dispatch(event);
    }

    /// How many times `subscribe` was called for `kind`.
    pub fn subscription_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    pub fn quit_count(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

impl BotHandle for MockHandle {
    fn subscribe(&self, kind: EventKind, observer: EventObserver) {
        *self
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(kind)
            .or_insert(0) += 1;
        self.events.subscribe(kind, observer);
    }

    fn quit(&self) {
        self.quits.fetch_add(1, Ordering::SeqCst);
    }
}
