// crates/testgate-filter/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers for filter integration tests.
// ============================================================================
//! ## Overview
//! Result-based assertions and description builders.

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

use testgate_core::TestDescription;

/// Standard result type used across filter integration tests.
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

/// Builds a description for `relative_path` with an optional id.
pub fn test(relative_path: &str, id: Option<&str>) -> TestDescription {
    TestDescription::new(format!("/suite/{relative_path}"), relative_path, 1, id.map(str::to_string))
}

/// Builds a description carrying the given keywords.
pub fn with_keywords(relative_path: &str, keywords: &[&str]) -> TestDescription {
    let mut desc = test(relative_path, None);
    desc.keywords = keywords.iter().map(|keyword| (*keyword).to_string()).collect();
    desc
}
