//! Diagnostic sink injected into every merge component
//!
//! Components never log through a global; they receive a `&dyn Diagnostics`
//! from whoever drives them. The binary uses [`TracingDiagnostics`], tests use
//! [`RecordingDiagnostics`] to assert on what was reported.

use std::cell::RefCell;

/// Severity of a reported message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Operator-facing diagnostic channel.
pub trait Diagnostics {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);

    /// Chatty per-line detail; dropped unless the sink cares.
    fn debug(&self, _message: &str) {}
}

/// Forwards every message to `tracing` under the `ucdmerge` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn info(&self, message: &str) {
        tracing::info!(target: "ucdmerge", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "ucdmerge", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "ucdmerge", "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "ucdmerge", "{}", message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: RefCell<Vec<(DiagnosticLevel, String)>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: DiagnosticLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }

    /// All messages recorded at `level`, in order
    pub fn at(&self, level: DiagnosticLevel) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(DiagnosticLevel::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(DiagnosticLevel::Error)
    }

    /// True if a message at `level` contains `needle`
    pub fn contains(&self, level: DiagnosticLevel, needle: &str) -> bool {
        self.messages
            .borrow()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn info(&self, message: &str) {
        self.push(DiagnosticLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(DiagnosticLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(DiagnosticLevel::Error, message);
    }

    fn debug(&self, message: &str) {
        self.push(DiagnosticLevel::Debug, message);
    }
}
