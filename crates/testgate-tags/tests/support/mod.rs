// crates/testgate-tags/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers for tag scanning integration tests.
// ============================================================================
//! ## Overview
//! Result-based assertions plus an on-disk suite builder backed by `tempfile`.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use testgate_config::SuiteConfig;
use testgate_core::MemorySink;
use testgate_tags::ScanConfig;
use testgate_tags::TestScanner;

/// Standard result type used across tag integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

/// Temporary suite directory.
pub struct Suite {
    /// Owned temporary root.
    dir: TempDir,
}

impl Suite {
    /// Creates an empty suite.
    pub fn new() -> TestResult<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Returns the absolute path of a root-relative file.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Writes a root-relative file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> TestResult<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Builds a scanner with the default suite configuration.
    pub fn scanner(&self) -> TestScanner<MemorySink> {
        self.scanner_with(SuiteConfig::default())
    }

    /// Builds a scanner with the given suite configuration.
    pub fn scanner_with(&self, suite: SuiteConfig) -> TestScanner<MemorySink> {
        TestScanner::new(ScanConfig::for_suite(self.dir.path(), suite), MemorySink::new())
    }
}
