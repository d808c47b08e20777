//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Bind listener → Install signals → Connect bot → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain connections → Disconnect bot → Exit 0
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Disconnect bot → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Signal handling is an explicit config flag, off in test harnesses
//! - The bot connects only after the listener is bound

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::BodyService;
