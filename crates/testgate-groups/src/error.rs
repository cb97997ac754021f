// crates/testgate-groups/src/error.rs
// ============================================================================
// Module: Group Errors
// Description: Faults raised when resolving groups.
// Purpose: Stable, programmatic error variants for group resolution.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Load-time problems never abort a load: they mark the affected group
//! invalid and are reported to the diagnostic sink. Asking for the files of
//! an invalid group is a hard [`GroupError::InvalidGroup`] fault.

use thiserror::Error;

/// Group resolution failure.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    /// The group was marked invalid at load time.
    #[error("invalid group {name}: {}", reasons.join("; "))]
    InvalidGroup {
        /// Group name.
        name: String,
        /// Load-time problems, in discovery order.
        reasons: Vec<String>,
    },
    /// No group file defines the name.
    #[error("group not found: {name}")]
    UnknownGroup {
        /// Requested name.
        name: String,
    },
    /// The memo table lock was poisoned by a panicking caller.
    #[error("group cache is poisoned")]
    CachePoisoned,
}
