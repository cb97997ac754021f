// crates/testgate-groups/src/lib.rs
// ============================================================================
// Module: Test Gate Groups Library
// Description: Named test groups loaded from properties-style group files.
// Purpose: Resolve group names to the files and directories they select.
// Dependencies: petgraph, testgate-config, testgate-core
// ============================================================================

//! ## Overview
//! Group files map names to whitespace-separated tokens:
//!
//! ```text
//! tier1 = :core :lang -lang/Slow.java
//! core  = /util lib/p/*.java
//! ```
//!
//! A token is a path (leading `/` is suite-root relative, otherwise relative
//! to the group file) or a `:name` group reference; a leading `-` excludes.
//! [`GroupSet`] validates everything at load, including reference cycles,
//! and resolves groups lazily.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod group;
pub mod paths;
pub mod properties;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::GroupError;
pub use group::Entry;
pub use group::Group;
pub use group::GroupSet;
pub use group::Target;
pub use group::valid_group_name;
pub use paths::PathRules;
pub use paths::PathSet;
pub use properties::Property;
pub use properties::parse_properties;
