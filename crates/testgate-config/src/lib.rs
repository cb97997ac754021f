// crates/testgate-config/src/lib.rs
// ============================================================================
// Module: Test Gate Config Library
// Description: Suite and run configuration model, validation, and examples.
// Purpose: Single source of truth for testgate.toml semantics.
// Dependencies: requires-logic, testgate-core, serde, toml
// ============================================================================

//! ## Overview
//! `testgate-config` defines the two configuration documents a selection run
//! consumes: the suite-level [`SuiteConfig`] kept at the suite root, and the
//! per-invocation [`RunConfig`]. Both are loaded from TOML with strict size
//! and path limits and validated before use. Per-directory overrides resolve
//! into immutable [`DirectoryProperties`] snapshots.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod directory;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use directory::DirectoryOverride;
pub use directory::DirectoryProperties;
pub use examples::run_toml_example;
pub use examples::suite_toml_example;
