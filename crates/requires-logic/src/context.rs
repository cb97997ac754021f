// crates/requires-logic/src/context.rs
// ============================================================================
// Module: Evaluation Context
// Description: Name to value table that expressions evaluate against.
// Purpose: Hold platform facts, including facts that failed to resolve.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`Context`] maps property names to values. A value may instead be an
//! error marker carrying the reason the fact could not be determined;
//! evaluating an expression that touches such a name faults with that reason.
//! Names absent from the context evaluate to the literal `"null"`.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::names::KnownNames;

/// Literal value of an undefined property.
pub const NULL_VALUE: &str = "null";

/// One context entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContextValue {
    /// Resolved value.
    Value(String),
    /// Property failed to resolve; carries the reason.
    Error(String),
}

/// Full evaluation context for one run configuration.
///
/// # Invariants
/// - `null` always maps to the literal `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Entries keyed by property name.
    entries: BTreeMap<String, ContextValue>,
}

impl Context {
    /// Creates a context holding only the `null` constant.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(NULL_VALUE.to_string(), ContextValue::Value(NULL_VALUE.to_string()));
        Self {
            entries,
        }
    }

    /// Sets a value, replacing any previous entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), ContextValue::Value(value.into()));
    }

    /// Sets a value only when the name has no entry yet.
    ///
    /// Returns true when the value was stored.
    pub fn set_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return false;
        }
        self.entries.insert(name, ContextValue::Value(value.into()));
        true
    }

    /// Marks a property as failing with the given reason.
    pub fn set_error(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        self.entries.insert(name.into(), ContextValue::Error(reason.into()));
    }

    /// Returns the entry for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.entries.get(name)
    }

    /// Returns the resolved value for a name, ignoring error markers.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(ContextValue::Value(value)) => Some(value.as_str()),
            Some(ContextValue::Error(_)) | None => None,
        }
    }

    /// Returns true when the name has an entry of either kind.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of entries, including `null`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when only `null` is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Derives the names-only view of this context.
    #[must_use]
    pub fn known_names(&self) -> KnownNames {
        KnownNames::for_suite(self.entries.keys().cloned())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut ctx = Self::new();
        for (name, value) in iter {
            ctx.set(name, value);
        }
        ctx
    }
}
