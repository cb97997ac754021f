// crates/testgate-config/src/directory.rs
// ============================================================================
// Module: Directory Properties
// Description: Per-directory overrides and their resolved snapshots.
// Purpose: Resolve inherited suite settings top-down, property by property.
// Dependencies: serde, crate::config
// ============================================================================

//! ## Overview
//! Each suite directory may override suite settings through a
//! `[directories."<path>"]` table. [`DirectoryProperties`] is the immutable
//! result of applying every override from the suite root down to one
//! directory. Each property has its own inheritance rule:
//! - `modules`, `enable_preview`: the nearest override replaces the value.
//! - `testng`, `junit`: the first ancestor that sets one fixes the runner and
//!   its root for every descendant.
//! - `keys`: an override intersects with the inherited set and never widens it.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::config::ConfigError;
use crate::config::SuiteConfig;
use crate::config::normalize_dir;
use crate::config::normalize_key;
use crate::config::validate_keys;
use crate::config::validate_modules;

// ============================================================================
// SECTION: Overrides
// ============================================================================

/// Settings a directory may override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryOverride {
    /// Replacement default `@modules` entries.
    #[serde(default)]
    pub modules: Option<Vec<String>>,
    /// Replacement default for `@enablePreview`.
    #[serde(default)]
    pub enable_preview: Option<bool>,
    /// Tests in this directory default to the TestNG runner.
    #[serde(default)]
    pub testng: bool,
    /// Tests in this directory default to the JUnit runner.
    #[serde(default)]
    pub junit: bool,
    /// Narrowed valid-key set.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}

impl DirectoryOverride {
    /// Validates the override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] with a field-qualified message.
    pub fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.testng && self.junit {
            return Err(ConfigError::Invalid(format!("{field} cannot set both testng and junit")));
        }
        if let Some(keys) = &self.keys {
            validate_keys(&format!("{field}.keys"), keys)?;
        }
        if let Some(modules) = &self.modules {
            validate_modules(&format!("{field}.modules"), modules)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Resolved Properties
// ============================================================================

/// Resolved settings for one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryProperties {
    /// Root-relative directory; empty for the suite root.
    pub dir: String,
    /// Default `@modules` entries.
    pub modules: Vec<String>,
    /// Default for `@enablePreview`.
    pub enable_preview: bool,
    /// Root of the enclosing TestNG tree.
    pub testng_root: Option<String>,
    /// Root of the enclosing JUnit tree.
    pub junit_root: Option<String>,
    /// Valid key set; `None` makes `@key` an unknown tag.
    pub keys: Option<BTreeSet<String>>,
}

impl DirectoryProperties {
    /// Returns the properties of the suite root.
    #[must_use]
    pub fn root(suite: &SuiteConfig) -> Self {
        let mut properties = Self {
            dir: String::new(),
            modules: suite.modules.clone(),
            enable_preview: suite.enable_preview,
            testng_root: None,
            junit_root: None,
            keys: suite.valid_keys(),
        };
        properties.mark_runner_root(suite);
        properties
    }

    /// Derives the properties of a child directory.
    ///
    /// `dir` is the child's root-relative path.
    #[must_use]
    pub fn child(&self, suite: &SuiteConfig, dir: &str) -> Self {
        let mut next = self.clone();
        next.dir = normalize_dir(dir);
        next.mark_runner_root(suite);
        let Some(overrides) = suite.directory_override(&next.dir) else {
            return next;
        };
        if let Some(modules) = &overrides.modules {
            next.modules.clone_from(modules);
        }
        if let Some(enable_preview) = overrides.enable_preview {
            next.enable_preview = enable_preview;
        }
        if next.testng_root.is_none() && next.junit_root.is_none() {
            if overrides.testng {
                next.testng_root = Some(next.dir.clone());
            } else if overrides.junit {
                next.junit_root = Some(next.dir.clone());
            }
        }
        if let (Some(inherited), Some(narrowed)) = (&next.keys, &overrides.keys) {
            let narrowed: BTreeSet<String> = narrowed.iter().map(|key| normalize_key(key)).collect();
            next.keys = Some(inherited.intersection(&narrowed).cloned().collect());
        }
        next
    }

    /// Returns true when tests here default to the TestNG runner.
    #[must_use]
    pub const fn is_testng(&self) -> bool {
        self.testng_root.is_some()
    }

    /// Returns true when tests here default to the JUnit runner.
    #[must_use]
    pub const fn is_junit(&self) -> bool {
        self.junit_root.is_some()
    }

    /// Applies the suite-level runner directory lists.
    fn mark_runner_root(&mut self, suite: &SuiteConfig) {
        if self.testng_root.is_some() || self.junit_root.is_some() {
            return;
        }
        if suite.testng_dirs.iter().any(|dir| normalize_dir(dir) == self.dir) {
            self.testng_root = Some(self.dir.clone());
        } else if suite.junit_dirs.iter().any(|dir| normalize_dir(dir) == self.dir) {
            self.junit_root = Some(self.dir.clone());
        }
    }
}
