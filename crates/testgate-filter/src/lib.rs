// crates/testgate-filter/src/lib.rs
// ============================================================================
// Module: Test Gate Filter Library
// Description: Caching test filters and the standard selection chain.
// Purpose: Decide which described tests run on a given target.
// Dependencies: requires-logic, testgate-config, testgate-core
// ============================================================================

//! ## Overview
//! Every filter answers one question about a [`testgate_core::TestDescription`].
//! Most answers depend on a small part of the description, so those filters
//! implement [`CachingTestFilter`] and run behind a [`CachingFilter`] that
//! computes each distinct key once. [`FilterChain`] combines filters with
//! logical AND.
//!
//! The requires filter never rejects a test whose expression faults: the
//! fault is recorded against the test URL and the test is accepted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod chain;
pub mod error;
pub mod filter;
pub mod keyword;
pub mod lists;
pub mod modules;
pub mod requires;
pub mod status;
pub mod time_limit;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use chain::FilterChain;
pub use chain::Rejection;
pub use chain::RunInputs;
pub use chain::Selection;
pub use error::ChainError;
pub use error::FilterFault;
pub use filter::CachingFilter;
pub use filter::CachingTestFilter;
pub use filter::TestFilter;
pub use keyword::KeywordFilter;
pub use lists::ExcludeEntry;
pub use lists::ExcludeList;
pub use lists::ExcludeListFilter;
pub use lists::MatchList;
pub use lists::MatchListFilter;
pub use modules::ModulesFilter;
pub use requires::RequiresFilter;
pub use status::PriorStatusFilter;
pub use time_limit::TimeLimitFilter;
