// crates/testgate-filter/src/error.rs
// ============================================================================
// Module: Filter Errors
// Description: Faults raised while selecting tests and loading list files.
// Purpose: Stable, programmatic error variants for the filter chain.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A [`FilterFault`] means a filter could not decide. It is never cached, so
//! the same test faults again if asked again. [`ChainError`] covers the
//! inputs read once when a chain is built: exclude lists, match lists, and
//! the keyword expression.

use std::path::PathBuf;

use thiserror::Error;

/// A filter could not decide whether to accept a test.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterFault {
    /// An expression failed to parse or evaluate.
    #[error("{filter} filter failed for {url}: {reason}")]
    Evaluation {
        /// Filter name.
        filter: &'static str,
        /// Test URL.
        url: String,
        /// Fault message.
        reason: String,
    },
    /// The memo table lock was poisoned by a panicking caller.
    #[error("{filter} filter cache is poisoned")]
    CachePoisoned {
        /// Filter name.
        filter: &'static str,
    },
}

/// A filter chain could not be built.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// List file could not be read.
    #[error("cannot read {}: {reason}", path.display())]
    Io {
        /// List file path.
        path: PathBuf,
        /// Underlying error.
        reason: String,
    },
    /// A list line is malformed.
    #[error("{}:{line}: {reason}", path.display())]
    Parse {
        /// List file path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },
    /// Keyword expression in the run configuration is malformed.
    #[error("invalid keyword expression: {reason}")]
    Keywords {
        /// Parser message.
        reason: String,
    },
}
