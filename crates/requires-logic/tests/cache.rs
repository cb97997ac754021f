// crates/requires-logic/tests/cache.rs
// ============================================================================
// Test Module: Expression Cache
// Coverage: Sharing by source text and failure handling.
// ============================================================================
//! ## Overview
//! Integration tests for [`requires_logic::ExprCache`].

#![allow(
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

mod support;

use std::sync::Arc;

use requires_logic::ExprCache;
use support::TestResult;
use support::ensure;

#[test]
fn identical_text_shares_one_tree() -> TestResult {
    let cache = ExprCache::new();
    let first = cache.get_or_parse("os.family == \"linux\"")?;
    let second = cache.get_or_parse("os.family == \"linux\"")?;
    ensure(Arc::ptr_eq(&first, &second), "same tree")?;
    ensure(cache.len() == 1, "one entry")?;
    Ok(())
}

#[test]
fn parse_failures_are_not_cached() -> TestResult {
    let cache = ExprCache::new();
    ensure(cache.get_or_parse("a &").is_err(), "syntax error")?;
    ensure(cache.is_empty(), "nothing cached")?;
    Ok(())
}
