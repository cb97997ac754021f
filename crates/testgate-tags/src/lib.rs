// crates/testgate-tags/src/lib.rs
// ============================================================================
// Module: Test Gate Tags Library
// Description: Tag-comment extraction, validation, and normalization.
// Purpose: Turn annotated source files into normalized test descriptions.
// Dependencies: requires-logic, testgate-config, testgate-core, walkdir
// ============================================================================

//! ## Overview
//! Tests declare their metadata in comments:
//!
//! ```text
//! /*
//!  * @test id=default
//!  * @bug 8012345
//!  * @summary Checks that foo survives a bar
//!  * @requires os.family == "linux"
//!  * @run main/othervm Foo
//!  */
//! ```
//!
//! Scanning runs in four stages:
//! 1. a [`CommentStrategy`] chosen by file extension extracts comments;
//! 2. [`parse_tags`] splits each comment into `@name value` entries;
//! 3. per-tag rules validate each entry, keeping the first error;
//! 4. normalization fills defaults and derives keywords and timeouts.
//!
//! [`TestScanner`] drives the stages over files or whole suites and reports
//! unreadable files, unknown extensions, and duplicate tests to a
//! [`testgate_core::DiagnosticSink`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod comment;
pub mod error;
pub mod normalize;
pub mod rules;
pub mod scanner;
pub mod tag;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comment::BlockComments;
pub use comment::Comment;
pub use comment::CommentStrategy;
pub use comment::CommentStrategyRegistry;
pub use comment::HtmlComments;
pub use comment::ShellComments;
pub use error::ScanError;
pub use error::TagError;
pub use rules::Declaration;
pub use rules::RuleContext;
pub use rules::parse_module_spec;
pub use rules::valid_bug_id;
pub use scanner::ScanConfig;
pub use scanner::TestScanner;
pub use tag::TagEntry;
pub use tag::parse_tags;
