// crates/testgate-groups/src/paths.rs
// ============================================================================
// Module: Group Paths
// Description: Path sets, wildcard expansion, and exclusion subtraction.
// Purpose: Keep resolved groups minimal: directories stay whole when possible.
// Dependencies: testgate-config
// ============================================================================

//! ## Overview
//! A resolved group is a set of files and directories. A directory stands for
//! every test file below it, so it is kept whole unless an exclusion lies
//! inside it; then it is opened one level and the exclusions are applied to
//! each child in turn. [`PathSet`] keeps the set free of entries already
//! covered by an ancestor directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use testgate_config::SuiteConfig;

// ============================================================================
// SECTION: Expansion Rules
// ============================================================================

/// Which directory children count when a directory is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    /// Test file extensions without the dot; empty admits every file.
    extensions: BTreeSet<String>,
    /// Directory names never descended into.
    ignored_directories: BTreeSet<String>,
}

impl PathRules {
    /// Creates rules from extension and ignored-directory lists.
    #[must_use]
    pub fn new<E, I>(extensions: E, ignored_directories: I) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(|ext| ext.into().trim_start_matches('.').to_string()).collect(),
            ignored_directories: ignored_directories.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates rules using the suite's ignored directories.
    #[must_use]
    pub fn for_suite<E>(suite: &SuiteConfig, extensions: E) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self::new(extensions, suite.ignored_directory_names())
    }

    /// Returns true when a directory child belongs in an expansion.
    #[must_use]
    pub fn admits(&self, path: &Path) -> bool {
        let name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
        if path.is_dir() {
            return !self.ignored_directories.contains(name.as_ref());
        }
        self.extensions.is_empty()
            || path.extension().is_some_and(|ext| self.extensions.contains(ext.to_string_lossy().as_ref()))
    }
}

// ============================================================================
// SECTION: Path Set
// ============================================================================

/// Set of paths with no entry below another entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    /// Current entries.
    paths: BTreeSet<PathBuf>,
}

impl PathSet {
    /// Adds a path unless an ancestor is present; drops its descendants.
    pub fn add(&mut self, path: PathBuf) {
        if self.paths.iter().any(|existing| path.starts_with(existing)) {
            return;
        }
        self.paths.retain(|existing| !existing.starts_with(&path));
        self.paths.insert(path);
    }

    /// Returns the entries.
    #[must_use]
    pub fn into_paths(self) -> BTreeSet<PathBuf> {
        self.paths
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Returns what remains of `path` after removing `excluded` paths.
#[must_use]
pub fn subtract(path: &Path, excluded: &BTreeSet<PathBuf>, rules: &PathRules) -> Vec<PathBuf> {
    if excluded.iter().any(|exclusion| path.starts_with(exclusion)) {
        return Vec::new();
    }
    let excluded_inside = excluded.iter().any(|exclusion| exclusion != path && exclusion.starts_with(path));
    if !excluded_inside || !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    children(path).into_iter().filter(|child| rules.admits(child)).flat_map(|child| subtract(&child, excluded, rules)).collect()
}

/// Returns true when the last path component contains `*`.
#[must_use]
pub fn has_wildcard(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name.to_string_lossy().contains('*'))
}

/// Lists the entries of the parent directory matching the last component.
#[must_use]
pub fn expand_wildcard(path: &Path) -> Vec<PathBuf> {
    let (Some(parent), Some(pattern)) = (path.parent(), path.file_name()) else {
        return Vec::new();
    };
    let pattern = pattern.to_string_lossy();
    children(parent)
        .into_iter()
        .filter(|child| child.file_name().is_some_and(|name| glob_match(&pattern, &name.to_string_lossy())))
        .collect()
}

/// Returns directory entries sorted by path; unreadable directories are empty.
fn children(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(read) => read.filter_map(Result::ok).map(|entry| entry.path()).collect(),
        Err(_) => Vec::new(),
    };
    entries.sort();
    entries
}

/// Matches `name` against a pattern where `*` matches any run of characters.
fn glob_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return pattern == name;
    };
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };
    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len() ..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}
