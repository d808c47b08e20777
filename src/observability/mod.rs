//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP middleware, bot observers
//!     → diagnostics.rs (DiagnosticSink: tracing in production, memory in tests)
//!     → logging.rs (tracing subscriber, stdout)
//!
//! HTTP requests, bot events
//!     → metrics.rs (counters, gauges, histograms)
//!     → Prometheus exporter (only when configured)
//! ```

pub mod diagnostics;
pub mod logging;
pub mod metrics;

pub use diagnostics::{Diagnostic, DiagnosticSink, RecordingSink, Severity, SharedSink, TracingSink};
