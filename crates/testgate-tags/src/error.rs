// crates/testgate-tags/src/error.rs
// ============================================================================
// Module: Tag Errors
// Description: Errors recorded on declarations and raised while scanning.
// Purpose: Stable, programmatic error variants for tag processing.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`TagError`] values are recorded on a test description (first one wins)
//! and never abort parsing. [`ScanError`] values mean a whole file was
//! skipped.

use std::path::PathBuf;

use thiserror::Error;

/// Problem with one tag inside a declaration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Tag name is not recognized.
    #[error("invalid tag: @{name}")]
    UnknownTag {
        /// Tag name as written.
        name: String,
    },
    /// Tag requires a value.
    #[error("no value given for @{tag}")]
    EmptyValue {
        /// Tag name.
        tag: String,
    },
    /// Tag may appear only once.
    #[error("@{tag} may only be given once")]
    DuplicateTag {
        /// Tag name.
        tag: String,
    },
    /// Bug token does not match an accepted form.
    #[error("invalid bug id: {token}")]
    InvalidBug {
        /// Offending token.
        token: String,
    },
    /// Key token is not in the valid-key set.
    #[error("invalid key: {token}")]
    InvalidKey {
        /// Offending token.
        token: String,
    },
    /// Module entry is malformed.
    #[error("invalid module specification `{token}`: {reason}")]
    InvalidModule {
        /// Offending token.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// `@library` appeared after an action tag.
    #[error("@library must appear before the first action tag")]
    LibraryAfterAction,
    /// Requirement expression is malformed or names unknown properties.
    #[error("invalid @requires: {reason}")]
    Requires {
        /// Parser or validation message.
        reason: String,
    },
    /// `@enablePreview` value is neither `true` nor `false`.
    #[error("invalid @enablePreview value: {value}")]
    InvalidEnablePreview {
        /// Offending value.
        value: String,
    },
    /// Action text could not be parsed.
    #[error("invalid action: {text}")]
    InvalidAction {
        /// Offending text.
        text: String,
    },
    /// `/timeout=` option is not a number.
    #[error("invalid timeout: {value}")]
    InvalidTimeout {
        /// Offending value.
        value: String,
    },
    /// No run action was declared and none can be inferred.
    #[error("no default action for {source_name}")]
    NoDefaultAction {
        /// Declaring file name.
        source_name: String,
    },
}

/// Problem that causes a whole file to be skipped.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// File could not be read.
    #[error("cannot read {}: {reason}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        reason: String,
    },
    /// No comment strategy is registered for the extension.
    #[error("no comment strategy for {}", path.display())]
    UnknownExtension {
        /// File path.
        path: PathBuf,
    },
    /// File lies outside the suite root.
    #[error("{} is not under the suite root", path.display())]
    OutsideRoot {
        /// File path.
        path: PathBuf,
    },
}

impl ScanError {
    /// Returns the affected file.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io {
                path,
                ..
            }
            | Self::UnknownExtension {
                path,
            }
            | Self::OutsideRoot {
                path,
            } => path,
        }
    }
}
