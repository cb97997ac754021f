// crates/testgate-core/src/sink.rs
// ============================================================================
// Module: Diagnostic Sinks
// Description: Sink trait and reference implementations for diagnostics.
// Purpose: Route diagnostics to logs, memory, or nowhere.
// Dependencies: serde_json, thiserror, std
// ============================================================================

//! ## Overview
//! [`DiagnosticSink`] receives diagnostics from the scanner, the filters, and
//! the group resolver. Reporting never fails from the caller's point of view;
//! sinks that can fail keep their own failure accounting.
//!
//! - [`LogSink`] writes one JSON object per line to any writer.
//! - [`MemorySink`] collects diagnostics for later inspection.
//! - [`NullSink`] discards everything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticKind;

// ============================================================================
// SECTION: Sink Errors
// ============================================================================

/// Errors emitted by diagnostic sinks.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Log sink could not be opened.
    #[error("log open failed: {0}")]
    OpenFailed(String),
    /// Log sink failed to write.
    #[error("log write failed: {0}")]
    LogWriteFailed(String),
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Receives diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic.
    fn report(&self, diagnostic: &Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic);
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn report(&self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic);
    }
}

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// JSON-lines diagnostic sink.
pub struct LogSink<W: Write + Send> {
    /// Output writer for log records.
    writer: Mutex<W>,
    /// Number of records that could not be written.
    failures: AtomicU64,
}

impl<W: Write + Send> LogSink<W> {
    /// Creates a log sink over the writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            failures: AtomicU64::new(0),
        }
    }

    /// Writes one diagnostic as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::LogWriteFailed`] when serialization or the write fails.
    pub fn write(&self, diagnostic: &Diagnostic) -> Result<(), SinkError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| SinkError::LogWriteFailed("log writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, diagnostic)
            .map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        guard.flush().map_err(|err| SinkError::LogWriteFailed(err.to_string()))?;
        drop(guard);
        Ok(())
    }

    /// Returns the number of diagnostics that failed to write.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink<File> {
    /// Opens a log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::OpenFailed`] if the file cannot be opened.
    pub fn append_to(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| SinkError::OpenFailed(format!("{}: {err}", path.display())))?;
        Ok(Self::new(file))
    }
}

impl LogSink<io::Stderr> {
    /// Creates a sink writing to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> DiagnosticSink for LogSink<W> {
    fn report(&self, diagnostic: &Diagnostic) {
        if self.write(diagnostic).is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}

// ============================================================================
// SECTION: Memory Sink
// ============================================================================

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Recorded diagnostics in report order.
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns recorded diagnostics of one kind.
    #[must_use]
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|diagnostic| diagnostic.kind == kind)
            .cloned()
            .collect()
    }

    /// Returns the number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(diagnostic.clone());
    }
}

// ============================================================================
// SECTION: Null Sink
// ============================================================================

/// Discards diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
