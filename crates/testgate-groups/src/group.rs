// crates/testgate-groups/src/group.rs
// ============================================================================
// Module: Group Set
// Description: Loading, validation, and lazy resolution of test groups.
// Purpose: Map group names to the files and directories they select.
// Dependencies: petgraph, testgate-config, testgate-core, crate::{error, paths, properties}
// ============================================================================

//! ## Overview
//! A [`GroupSet`] is loaded from one or more group files. Each group is an
//! ordered list of entries; an entry includes or excludes a path or another
//! group. Validation happens once, at load:
//! - group names must match `[A-Za-z][A-Za-z0-9_]*`;
//! - every literal path must exist;
//! - reference cycles are found as strongly connected components of the
//!   reference graph, and every member of a cycle is marked invalid;
//! - a reference to an unknown, invalid, or empty group marks the
//!   referencing group invalid.
//!
//! Problems never abort a load. They mark groups invalid and are reported to
//! the [`DiagnosticSink`]. [`GroupSet::files_for`] resolves lazily, memoizes
//! per group, and fails hard for invalid groups.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;
use testgate_config::GroupFileRef;
use testgate_config::SuiteConfig;
use testgate_core::Diagnostic;
use testgate_core::DiagnosticKind;
use testgate_core::DiagnosticSink;

use crate::error::GroupError;
use crate::paths::PathSet;
use crate::paths::PathRules;
use crate::paths::expand_wildcard;
use crate::paths::has_wildcard;
use crate::paths::subtract;
use crate::properties::parse_properties;

// ============================================================================
// SECTION: Entries
// ============================================================================

/// What an entry selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Absolute file or directory path; may end in a wildcard component.
    Path(PathBuf),
    /// Another group, by name.
    Group(String),
}

/// One include or exclude token of a group definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// True for `-` prefixed tokens.
    pub exclude: bool,
    /// Selected path or group.
    pub target: Target,
}

/// One group as accumulated from every file that defines it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    /// Entries in definition order.
    pub entries: Vec<Entry>,
    /// Group files that define the group.
    pub sources: Vec<PathBuf>,
    /// Load-time problems; non-empty means invalid.
    pub problems: Vec<String>,
}

impl Group {
    /// Returns true when no load-time problem was found.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Returns the names of referenced groups.
    fn references(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match &entry.target {
            Target::Group(name) => Some(name.as_str()),
            Target::Path(_) => None,
        })
    }
}

// ============================================================================
// SECTION: Group Set
// ============================================================================

/// Validated group definitions with memoized resolution.
#[derive(Debug)]
pub struct GroupSet {
    /// Suite root.
    root: PathBuf,
    /// Directory expansion rules.
    rules: PathRules,
    /// Groups by name.
    groups: BTreeMap<String, Group>,
    /// Resolved file sets by group name.
    memo: Mutex<HashMap<String, Arc<BTreeSet<PathBuf>>>>,
}

impl GroupSet {
    /// Loads the group files a suite names, relative to `root`.
    ///
    /// Optional files that do not exist are skipped silently.
    pub fn load_suite(root: &Path, suite: &SuiteConfig, rules: PathRules, sink: &dyn DiagnosticSink) -> Self {
        let files: Vec<GroupFileRef> = suite
            .group_files()
            .into_iter()
            .map(|file| GroupFileRef {
                path: root.join(&file.path),
                optional: file.optional,
            })
            .collect();
        Self::load(root, &files, rules, sink)
    }

    /// Loads and validates group files.
    pub fn load(root: &Path, files: &[GroupFileRef], rules: PathRules, sink: &dyn DiagnosticSink) -> Self {
        let mut set = Self {
            root: root.to_path_buf(),
            rules,
            groups: BTreeMap::new(),
            memo: Mutex::new(HashMap::new()),
        };
        for file in files {
            match fs::read_to_string(&file.path) {
                Ok(text) => set.read_file(&file.path, &text),
                Err(err) if file.optional && err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => sink.report(
                    &Diagnostic::new(DiagnosticKind::Io, format!("cannot read group file: {err}")).with_path(&file.path),
                ),
            }
        }
        set.mark_cycles();
        set.mark_bad_references();
        for (name, group) in &set.groups {
            for problem in &group.problems {
                let mut diagnostic = Diagnostic::new(DiagnosticKind::Group, format!("group {name}: {problem}"));
                if let Some(source) = group.sources.first() {
                    diagnostic = diagnostic.with_path(source);
                }
                sink.report(&diagnostic);
            }
        }
        set
    }

    /// Returns every defined group name, valid or not.
    #[must_use]
    pub fn names(&self) -> BTreeSet<String> {
        self.groups.keys().cloned().collect()
    }

    /// Returns a group definition.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Returns the names of invalid groups.
    #[must_use]
    pub fn invalid_groups(&self) -> BTreeSet<String> {
        self.groups.iter().filter(|(_, group)| !group.is_valid()).map(|(name, _)| name.clone()).collect()
    }

    /// Resolves a group to the files and directories it selects.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::UnknownGroup`] for undefined names and
    /// [`GroupError::InvalidGroup`] for groups marked invalid at load.
    pub fn files_for(&self, name: &str) -> Result<Arc<BTreeSet<PathBuf>>, GroupError> {
        let group = self.groups.get(name).ok_or_else(|| GroupError::UnknownGroup {
            name: name.to_string(),
        })?;
        if !group.is_valid() {
            return Err(GroupError::InvalidGroup {
                name: name.to_string(),
                reasons: group.problems.clone(),
            });
        }
        if let Some(files) = self.lock()?.get(name) {
            return Ok(Arc::clone(files));
        }
        let files = Arc::new(self.resolve(group)?);
        let mut memo = self.lock()?;
        Ok(Arc::clone(memo.entry(name.to_string()).or_insert(files)))
    }

    /// Resolves several groups into one deduplicated set.
    ///
    /// # Errors
    ///
    /// Returns the first [`GroupError`] raised.
    pub fn files_for_all<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<BTreeSet<PathBuf>, GroupError> {
        let mut set = PathSet::default();
        for name in names {
            for path in self.files_for(name)?.iter() {
                set.add(path.clone());
            }
        }
        Ok(set.into_paths())
    }

    /// Computes includes minus excludes for one valid group.
    fn resolve(&self, group: &Group) -> Result<BTreeSet<PathBuf>, GroupError> {
        let mut included = PathSet::default();
        let mut excluded = BTreeSet::new();
        for entry in &group.entries {
            let paths: Vec<PathBuf> = match &entry.target {
                Target::Path(path) if has_wildcard(path) => expand_wildcard(path),
                Target::Path(path) => vec![path.clone()],
                Target::Group(name) => self.files_for(name)?.iter().cloned().collect(),
            };
            if entry.exclude {
                excluded.extend(paths);
            } else {
                for path in paths {
                    included.add(path);
                }
            }
        }
        let mut files = BTreeSet::new();
        for path in included.into_paths() {
            files.extend(subtract(&path, &excluded, &self.rules));
        }
        Ok(files)
    }

    /// Locks the memo table.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<BTreeSet<PathBuf>>>>, GroupError> {
        self.memo.lock().map_err(|_| GroupError::CachePoisoned)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Reads one group file, accumulating entries per group.
    fn read_file(&mut self, file: &Path, text: &str) {
        let base = file.parent().map_or_else(|| self.root.clone(), Path::to_path_buf);
        for property in parse_properties(text) {
            let group = self.groups.entry(property.key.clone()).or_default();
            group.sources.push(file.to_path_buf());
            if !valid_group_name(&property.key) {
                group.problems.push(format!("invalid group name at line {}", property.line));
            }
            for token in property.value.split_whitespace() {
                let (exclude, body) = match token.strip_prefix('-') {
                    Some(body) => (true, body),
                    None => (false, token),
                };
                if let Some(name) = body.strip_prefix(':') {
                    if name.is_empty() {
                        group.problems.push(format!("empty group reference: {token}"));
                        continue;
                    }
                    group.entries.push(Entry {
                        exclude,
                        target: Target::Group(name.to_string()),
                    });
                    continue;
                }
                if body.trim_matches('/').is_empty() {
                    group.problems.push(format!("empty path: {token}"));
                    continue;
                }
                let path = resolve_token(&self.root, &base, body);
                let exists = if has_wildcard(&path) { path.parent().is_some_and(Path::is_dir) } else { path.exists() };
                if !exists {
                    group.problems.push(format!("file not found: {body}"));
                    continue;
                }
                group.entries.push(Entry {
                    exclude,
                    target: Target::Path(path),
                });
            }
        }
    }

    /// Marks every member of a reference cycle invalid.
    fn mark_cycles(&mut self) {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let nodes: BTreeMap<&str, NodeIndex> =
            self.groups.keys().map(|name| (name.as_str(), graph.add_node(name.as_str()))).collect();
        for (name, group) in &self.groups {
            for reference in group.references() {
                if let (Some(from), Some(to)) = (nodes.get(name.as_str()), nodes.get(reference)) {
                    graph.update_edge(*from, *to, ());
                }
            }
        }
        let mut cyclic: Vec<Vec<String>> = Vec::new();
        for component in tarjan_scc(&graph) {
            let self_loop = component.len() == 1 && graph.contains_edge(component[0], component[0]);
            if component.len() > 1 || self_loop {
                let mut members: Vec<String> = component.iter().map(|node| graph[*node].to_string()).collect();
                members.sort();
                cyclic.push(members);
            }
        }
        for members in cyclic {
            let message = format!("cyclic group reference: {}", members.join(", "));
            for member in &members {
                if let Some(group) = self.groups.get_mut(member) {
                    group.problems.push(message.clone());
                }
            }
        }
    }

    /// Marks groups referencing unknown, invalid, or empty groups, to a fixpoint.
    fn mark_bad_references(&mut self) {
        loop {
            let mut found: Vec<(String, String)> = Vec::new();
            for (name, group) in &self.groups {
                if !group.is_valid() {
                    continue;
                }
                for reference in group.references() {
                    let usable = self.groups.get(reference).is_some_and(|target| target.is_valid() && !target.entries.is_empty());
                    if !usable {
                        found.push((name.clone(), reference.to_string()));
                    }
                }
            }
            if found.is_empty() {
                return;
            }
            for (name, reference) in found {
                if let Some(group) = self.groups.get_mut(&name) {
                    group.problems.push(format!("group not found: {reference}"));
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for names matching `[A-Za-z][A-Za-z0-9_]*`.
#[must_use]
pub fn valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Resolves a path token: `/` prefix is root-relative, otherwise file-relative.
fn resolve_token(root: &Path, base: &Path, token: &str) -> PathBuf {
    let trimmed = token.trim_end_matches('/');
    match trimmed.strip_prefix('/') {
        Some(rooted) => root.join(rooted),
        None => base.join(trimmed),
    }
}
