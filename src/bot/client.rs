//! Connector capability over the external game client.
//!
//! The game protocol itself is owned by whatever implements
//! [`BotConnector`]. The manager only sees three things: open a handle,
//! subscribe to the four lifecycle events, and quit.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::config::ConnectionConfig;

/// Lifecycle event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Spawn,
    End,
    Kicked,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Spawn,
        EventKind::End,
        EventKind::Kicked,
        EventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Spawn => "spawn",
            EventKind::End => "end",
            EventKind::Kicked => "kicked",
            EventKind::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// World position reported on spawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Lifecycle event reported by a connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum BotEvent {
    Spawn {
        position: Position,
        health: f32,
        food: u32,
    },
    End {
        reason: String,
    },
    Kicked {
        reason: String,
        logged_in: bool,
    },
    Error {
        message: String,
    },
}

impl BotEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            BotEvent::Spawn { .. } => EventKind::Spawn,
            BotEvent::End { .. } => EventKind::End,
            BotEvent::Kicked { .. } => EventKind::Kicked,
            BotEvent::Error { .. } => EventKind::Error,
        }
    }
}

/// Callback invoked for every event of the kind it was registered for.
pub type EventObserver = Arc<dyn Fn(&BotEvent) + Send + Sync>;

/// A live (or in-progress) connection to a game server.
pub trait BotHandle: Send + Sync + 'static {
    /// Register an observer for one event kind.
    fn subscribe(&self, kind: EventKind, observer: EventObserver);

    /// Ask the client to close the connection. Must not block.
    fn quit(&self);
}

/// Opens connections to a game server.
pub trait BotConnector: Send + Sync + 'static {
    type Handle: BotHandle;

    /// Start connecting and return the handle right away. Establishment is
    /// reported later through the handle's events.
    fn open(&self, config: &ConnectionConfig) -> Arc<Self::Handle>;
}

/// Observer registry shared by connector implementations.
///
/// Events are delivered in arrival order. An event whose kind has no
/// observer yet is queued, and everything behind it waits until an observer
/// for that kind subscribes. Observers always run outside the internal lock.
#[derive(Default)]
pub struct EventDispatcher {
    inner: Mutex<DispatcherState>,
}

#[derive(Default)]
struct DispatcherState {
    observers: HashMap<EventKind, Vec<EventObserver>>,
    pending: VecDeque<BotEvent>,
}

impl DispatcherState {
    /// Pop the head of the queue if it can be delivered now.
    fn next_deliverable(&mut self) -> Option<(BotEvent, Vec<EventObserver>)> {
        let kind = self.pending.front()?.kind();
        let observers = self.observers.get(&kind).filter(|list| !list.is_empty())?.clone();
        let event = self.pending.pop_front()?;
        Some((event, observers))
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: EventKind, observer: EventObserver) {
        self.lock().observers.entry(kind).or_default().push(observer);
        self.flush();
    }

    pub fn dispatch(&self, event: BotEvent) {
        self.lock().pending.push_back(event);
        self.flush();
    }

    fn flush(&self) {
        loop {
            let Some((event, observers)) = self.lock().next_deliverable() else {
                return;
            };
            for observer in observers {
                observer(&event);
            }
        }
    }

    /// Number of observers registered for `kind`.
    pub fn observer_count(&self, kind: EventKind) -> usize {
        self.lock().observers.get(&kind).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, DispatcherState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("EventDispatcher")
            .field("observers", &state.observers.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (EventObserver, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        (
            Arc::new(move |_: &BotEvent| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
            count,
        )
    }

    #[test]
    fn dispatch_reaches_matching_observers_only() {
        let dispatcher = EventDispatcher::new();
        let (on_end, ends) = counting();
        let (on_error, errors) = counting();
        dispatcher.subscribe(EventKind::End, on_end);
        dispatcher.subscribe(EventKind::Error, on_error);

        dispatcher.dispatch(BotEvent::End {
            reason: "socket closed".into(),
        });

        assert_eq!(ends.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn early_events_are_replayed_on_subscribe() {
        let dispatcher = EventDispatcher::new();
        dispatcher.dispatch(BotEvent::Error {
            message: "connection refused".into(),
        });
        dispatcher.dispatch(BotEvent::End {
            reason: "socket closed".into(),
        });

        let (on_error, errors) = counting();
        dispatcher.subscribe(EventKind::Error, on_error);
        assert_eq!(errors.load(Ordering::SeqCst), 1);

        let (on_end, ends) = counting();
        dispatcher.subscribe(EventKind::End, on_end);
        assert_eq!(ends.load(Ordering::SeqCst), 1);

        let (late, late_count) = counting();
        dispatcher.subscribe(EventKind::End, late);
        assert_eq!(late_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn early_events_keep_arrival_order() {
        let dispatcher = EventDispatcher::new();
        dispatcher.dispatch(BotEvent::Error {
            message: "connection refused".into(),
        });
        dispatcher.dispatch(BotEvent::End {
            reason: "socket closed".into(),
        });

        let seen = Arc::new(Mutex::new(Vec::new()));
        for kind in EventKind::ALL {
            let seen = seen.clone();
            dispatcher.subscribe(
                kind,
                Arc::new(move |event: &BotEvent| {
                    seen.lock().unwrap().push(event.kind().as_str());
                }),
            );
        }

        assert_eq!(*seen.lock().unwrap(), vec!["error", "end"]);
    }

    #[test]
    fn live_events_queue_behind_undelivered_ones() {
        let dispatcher = EventDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = |seen: &Arc<Mutex<Vec<&'static str>>>| -> EventObserver {
            let seen = seen.clone();
            Arc::new(move |event: &BotEvent| {
                seen.lock().unwrap().push(event.kind().as_str());
            })
        };

        dispatcher.subscribe(EventKind::End, record(&seen));
        dispatcher.dispatch(BotEvent::Error {
            message: "timed out".into(),
        });
        dispatcher.dispatch(BotEvent::End {
            reason: "socket closed".into(),
        });
        assert!(seen.lock().unwrap().is_empty());

        dispatcher.subscribe(EventKind::Error, record(&seen));
        assert_eq!(*seen.lock().unwrap(), vec!["error", "end"]);
    }

    #[test]
    fn observer_counts_per_kind() {
        let dispatcher = EventDispatcher::new();
        for kind in EventKind::ALL {
            let (observer, _) = counting();
            dispatcher.subscribe(kind, observer);
        }
        for kind in EventKind::ALL {
            assert_eq!(dispatcher.observer_count(kind), 1);
        }
    }

    #[test]
    fn position_display() {
        let p = Position {
            x: 0.5,
            y: 64.0,
            z: -3.25,
        };
        assert_eq!(p.to_string(), "(0.5, 64, -3.25)");
    }
}
