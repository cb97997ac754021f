// crates/requires-logic/src/names.rs
// ============================================================================
// Module: Property Name Sets
// Description: Names-only view used to validate expressions before evaluation.
// Purpose: Check referenced property names without resolving any values.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A suite declares which property names `@requires` may reference. The set
//! is known long before a target runtime is available, so validation runs
//! against [`PropertyNames`] rather than a full [`crate::Context`].
//! Families such as `vm.opt.*` are open-ended: any name under the prefix is
//! legal.

use std::collections::BTreeSet;
use std::collections::HashSet;
use std::hash::BuildHasher;

/// Property names every context provides.
pub const BUILTIN_NAMES: &[&str] = &[
    "null",
    "jdk.version",
    "jdk.version.major",
    "os.name",
    "os.arch",
    "os.simpleArch",
    "os.version",
    "os.simpleVersion",
    "os.family",
    "os.processors",
    "os.maxMemory",
    "os.maxSwap",
    "test.thread.factory",
    "vm.gc",
    "vm.compMode",
];

/// Prefixes whose every extension is a legal name.
pub const BUILTIN_FAMILIES: &[&str] = &["vm.opt."];

/// Answers whether a property name may be referenced.
pub trait PropertyNames {
    /// Returns true when `name` is legal in an expression.
    fn is_known(&self, name: &str) -> bool;
}

impl<S: BuildHasher> PropertyNames for HashSet<String, S> {
    fn is_known(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl PropertyNames for BTreeSet<String> {
    fn is_known(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<F> PropertyNames for F
where
    F: Fn(&str) -> bool,
{
    fn is_known(&self, name: &str) -> bool {
        (self)(name)
    }
}

/// Restricted names-only context for one suite.
///
/// # Invariants
/// - Built-in names and families are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownNames {
    /// Exact names.
    names: BTreeSet<String>,
    /// Prefix families.
    families: BTreeSet<String>,
}

impl KnownNames {
    /// Creates the built-in name set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            names: BUILTIN_NAMES.iter().map(|name| (*name).to_string()).collect(),
            families: BUILTIN_FAMILIES.iter().map(|family| (*family).to_string()).collect(),
        }
    }

    /// Creates the built-in set extended with suite-declared names.
    #[must_use]
    pub fn for_suite<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known = Self::builtin();
        known.names.extend(extra.into_iter().map(Into::into));
        known
    }

    /// Adds an exact name.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Adds a prefix family such as `vm.opt.`.
    pub fn insert_family(&mut self, prefix: impl Into<String>) {
        self.families.insert(prefix.into());
    }

    /// Returns the exact names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for KnownNames {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PropertyNames for KnownNames {
    fn is_known(&self, name: &str) -> bool {
        self.names.contains(name)
            || self
                .families
                .iter()
                .any(|family| name.len() > family.len() && name.starts_with(family.as_str()))
    }
}
