// crates/testgate-filter/src/lists.rs
// ============================================================================
// Module: Exclude and Match Lists
// Description: Parsing and filters for external test lists.
// Purpose: Select tests by membership in platform-qualified list files.
// Dependencies: testgate-config, testgate-core, crate::{error, filter}
// ============================================================================

//! ## Overview
//! Exclude list lines read `<test-url> <bug-ids> <platforms> [synopsis]`.
//! Bug ids and platforms are comma-separated; platforms are `os-arch`
//! qualifiers matched against the run's [`PlatformConfig`]. A URL without
//! `#id` covers every test declared in that file.
//!
//! Match list lines hold one test URL each. Lines starting with `#` are
//! comments in both formats.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use testgate_config::PlatformConfig;
use testgate_core::TestDescription;

use crate::error::ChainError;
use crate::error::FilterFault;
use crate::filter::CachingTestFilter;

// ============================================================================
// SECTION: Exclude List
// ============================================================================

/// One exclude list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeEntry {
    /// Test URL, with or without `#id`.
    pub url: String,
    /// Bug ids explaining the exclusion.
    pub bugs: Vec<String>,
    /// Platform qualifiers the exclusion applies to.
    pub platforms: Vec<String>,
    /// Free-text synopsis.
    pub synopsis: String,
}

impl ExcludeEntry {
    /// Returns true when the entry covers the test.
    #[must_use]
    pub fn covers(&self, test: &TestDescription) -> bool {
        if self.url.contains('#') { self.url == test.url } else { self.url == test.relative_path }
    }

    /// Returns true when the entry applies on the platform.
    #[must_use]
    pub fn applies_on(&self, platform: &PlatformConfig) -> bool {
        self.platforms.iter().any(|qualifier| platform.matches(qualifier))
    }
}

/// Parsed exclude list entries keyed by file path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeList {
    /// Entries keyed by the URL's file part.
    entries: BTreeMap<String, Vec<ExcludeEntry>>,
}

impl ExcludeList {
    /// Loads an exclude list file.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] when the file cannot be read or a line is malformed.
    pub fn load(path: &Path) -> Result<Self, ChainError> {
        let text = read_list(path)?;
        Self::parse(path, &text)
    }

    /// Parses exclude list text; `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Parse`] when a line has fewer than three fields.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ChainError> {
        let mut list = Self::default();
        for (index, line) in list_lines(text) {
            let mut fields = line.split_whitespace();
            let (Some(url), Some(bugs), Some(platforms)) = (fields.next(), fields.next(), fields.next()) else {
                return Err(ChainError::Parse {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: "expected `<test-url> <bug-ids> <platforms>`".to_string(),
                });
            };
            list.insert(ExcludeEntry {
                url: url.to_string(),
                bugs: split_commas(bugs),
                platforms: split_commas(platforms),
                synopsis: fields.collect::<Vec<_>>().join(" "),
            });
        }
        Ok(list)
    }

    /// Adds an entry.
    pub fn insert(&mut self, entry: ExcludeEntry) {
        let file = entry.url.split('#').next().unwrap_or_default().to_string();
        self.entries.entry(file).or_default().push(entry);
    }

    /// Merges another list into this one.
    pub fn merge(&mut self, other: Self) {
        for entry in other.entries.into_values().flatten() {
            self.insert(entry);
        }
    }

    /// Returns the first entry excluding the test on the platform.
    #[must_use]
    pub fn excluding_entry(&self, test: &TestDescription, platform: &PlatformConfig) -> Option<&ExcludeEntry> {
        self.entries
            .get(&test.relative_path)?
            .iter()
            .find(|entry| entry.covers(test) && entry.applies_on(platform))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true when the list has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rejects tests covered by an exclude list on the run platform.
#[derive(Debug, Clone)]
pub struct ExcludeListFilter {
    /// Merged exclude list.
    list: ExcludeList,
    /// Run platform.
    platform: PlatformConfig,
}

impl ExcludeListFilter {
    /// Creates the filter.
    #[must_use]
    pub const fn new(list: ExcludeList, platform: PlatformConfig) -> Self {
        Self {
            list,
            platform,
        }
    }
}

impl CachingTestFilter for ExcludeListFilter {
    type Key = String;

    fn name(&self) -> &'static str {
        "exclude_list"
    }

    fn description(&self) -> &'static str {
        "Reject tests named in an exclude list"
    }

    fn reason(&self) -> &'static str {
        "Test is in an exclude list"
    }

    fn cache_key(&self, test: &TestDescription) -> String {
        test.url.clone()
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        Ok(self.list.excluding_entry(test, &self.platform).is_none())
    }
}

// ============================================================================
// SECTION: Match List
// ============================================================================

/// Set of test URLs to select.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchList {
    /// Listed URLs.
    urls: BTreeSet<String>,
}

impl MatchList {
    /// Loads a match list file.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Io`] when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ChainError> {
        Ok(Self::parse(&read_list(path)?))
    }

    /// Parses match list text. The first token of each line is the URL.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            urls: list_lines(text)
                .filter_map(|(_, line)| line.split_whitespace().next())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Merges another list into this one.
    pub fn merge(&mut self, other: Self) {
        self.urls.extend(other.urls);
    }

    /// Returns true when the test or its whole file is listed.
    #[must_use]
    pub fn contains(&self, test: &TestDescription) -> bool {
        self.urls.contains(&test.url) || self.urls.contains(&test.relative_path)
    }

    /// Returns the number of listed URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true when nothing is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Accepts only tests named in a match list.
#[derive(Debug, Clone)]
pub struct MatchListFilter {
    /// Merged match list.
    list: MatchList,
}

impl MatchListFilter {
    /// Creates the filter.
    #[must_use]
    pub const fn new(list: MatchList) -> Self {
        Self {
            list,
        }
    }
}

impl CachingTestFilter for MatchListFilter {
    type Key = String;

    fn name(&self) -> &'static str {
        "match_list"
    }

    fn description(&self) -> &'static str {
        "Select only tests named in a match list"
    }

    fn reason(&self) -> &'static str {
        "Test is not in a match list"
    }

    fn cache_key(&self, test: &TestDescription) -> String {
        test.url.clone()
    }

    fn compute_value(&self, test: &TestDescription) -> Result<bool, FilterFault> {
        Ok(self.list.contains(test))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a list file.
fn read_list(path: &Path) -> Result<String, ChainError> {
    fs::read_to_string(path).map_err(|err| ChainError::Io {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Yields `(index, content)` for lines that are neither blank nor comments.
fn list_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Splits a comma-separated field.
fn split_commas(field: &str) -> Vec<String> {
    field.split(',').map(str::trim).filter(|part| !part.is_empty()).map(str::to_string).collect()
}
