// crates/testgate-core/src/diagnostics.rs
// ============================================================================
// Module: Diagnostics
// Description: Structured records for non-fatal problems.
// Purpose: Give every component one serializable way to report issues.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Diagnostic`] describes a problem that does not stop the current
//! operation: an unreadable source file, a dropped duplicate test, a group
//! marked invalid. Components hand diagnostics to a
//! [`crate::DiagnosticSink`] and continue.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Malformed tag or expression inside a source file.
    Parse,
    /// File could not be read or has no comment strategy.
    Io,
    /// Test URL already declared by an earlier file.
    Duplicate,
    /// Group definition marked invalid.
    Group,
    /// Filter fault recorded during selection.
    Filter,
    /// Configuration problem.
    Config,
}

impl DiagnosticKind {
    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Io => "io",
            Self::Duplicate => "duplicate",
            Self::Group => "group",
            Self::Filter => "filter",
            Self::Config => "config",
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// File the problem relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Test URL the problem relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with no location.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: None,
            url: None,
            message: message.into(),
        }
    }

    /// Attaches a file path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches a test URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind.as_str())?;
        if let Some(path) = &self.path {
            write!(f, " {}", path.display())?;
        }
        if let Some(url) = &self.url {
            write!(f, " {url}")?;
        }
        write!(f, ": {}", self.message)
    }
}
