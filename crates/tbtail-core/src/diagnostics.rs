//! Diagnostic sink for non-fatal conditions
//!
//! The reader, tailer and analytics never fail outward on bad input. They
//! describe what happened to a sink and carry on with the data they have.

use std::fmt;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Debug => write!(f, "DEBUG"),
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// A reported message with its severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Receiver of `(severity, message)` pairs
pub trait DiagnosticSink {
    fn report(&mut self, severity: Severity, message: String);

    fn info(&mut self, message: String) {
        self.report(Severity::Info, message);
    }

    fn warn(&mut self, message: String) {
        self.report(Severity::Warning, message);
    }
}

/// Collects diagnostics in memory
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, severity: Severity, message: String) {
        self.push(Diagnostic { severity, message });
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _severity: Severity, _message: String) {}
}

/// Forwards diagnostics to `tracing` at the matching level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, severity: Severity, message: String) {
        match severity {
            Severity::Debug => tracing::debug!(target: "tbtail::diagnostics", "{}", message),
            Severity::Info => tracing::info!(target: "tbtail::diagnostics", "{}", message),
            Severity::Warning => tracing::warn!(target: "tbtail::diagnostics", "{}", message),
            Severity::Error => tracing::error!(target: "tbtail::diagnostics", "{}", message),
        }
    }
}
