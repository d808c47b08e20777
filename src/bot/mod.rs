//! Bot connection subsystem.
//!
//! # Data Flow
//! ```text
//! startup / caller
//!     → manager.rs (merge overrides, validate, hold the single handle)
//!     → client.rs  (BotConnector::open → BotHandle)
//!     → tcp.rs     (socket session on the tokio runtime)
//!
//! handle events (spawn, end, kicked, error)
//!     → observers registered by the manager
//!     → DiagnosticSink + metrics + ConnectionState
//! ```
//!
//! # Design Decisions
//! - The manager is an owned object, not process-wide state
//! - Events are logged only: no retries, no reconnection
//! - mock.rs stands in for the network in tests

pub mod client;
pub mod manager;
pub mod mock;
pub mod tcp;

pub use client::{BotConnector, BotEvent, BotHandle, EventKind, EventObserver, Position};
pub use manager::{BotError, ConnectionManager, ConnectionState};
pub use mock::{MockConnector, MockHandle};
pub use tcp::{TcpConnector, TcpHandle};
