// crates/testgate-core/src/lib.rs
// ============================================================================
// Module: Test Gate Core Library
// Description: Public API surface for shared test metadata types.
// Purpose: Expose test descriptions, diagnostics, and diagnostic sinks.
// Dependencies: crate::{description, diagnostics, sink, status}
// ============================================================================

//! ## Overview
//! Test Gate core holds the data model shared by the tag scanner, the test
//! filters, and the group resolver: normalized [`TestDescription`] records,
//! their run [`Action`]s and [`ModuleSpec`]s, and the [`Diagnostic`] stream
//! that every component reports non-fatal problems through.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod description;
pub mod diagnostics;
pub mod sink;
pub mod status;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use description::Action;
pub use description::DEFAULT_ACTION_TIMEOUT_SECS;
pub use description::ModuleModifier;
pub use description::ModuleSpec;
pub use description::TestDescription;
pub use description::test_url;
pub use diagnostics::Diagnostic;
pub use diagnostics::DiagnosticKind;
pub use sink::DiagnosticSink;
pub use sink::LogSink;
pub use sink::MemorySink;
pub use sink::NullSink;
pub use sink::SinkError;
pub use status::TestStatus;
