//! Pluggable diagnostic sink.
//!
//! Middleware and bot observers report through [`DiagnosticSink`] instead of
//! calling `tracing` directly, so tests can assert on what was reported.

use std::sync::{Arc, Mutex};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// A single operational diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Component that produced it ("http", "bot").
    pub source: &'static str,
    pub message: String,
}

/// Receiver of operational diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);

    fn info(&self, source: &'static str, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Info,
            source,
            message,
        });
    }

    fn warn(&self, source: &'static str, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Warn,
            source,
            message,
        });
    }

    fn error(&self, source: &'static str, message: String) {
        self.emit(Diagnostic {
            severity: Severity::Error,
            source,
            message,
        });
    }
}

/// Shared handle to a sink.
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Production sink: forwards every diagnostic to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let Diagnostic {
            severity,
            source,
            message,
        } = diagnostic;
        match severity {
            Severity::Info => tracing::info!(source, "{}", message),
            Severity::Warn => tracing::warn!(source, "{}", message),
            Severity::Error => tracing::error!(source, "{}", message),
        }
    }
}

/// In-memory sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded diagnostics, oldest first.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    /// Messages recorded at the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|d| d.message.contains(needle))
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // Poisoned entries stay readable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}
