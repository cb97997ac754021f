// crates/testgate-tags/src/scanner.rs
// ============================================================================
// Module: Test Scanner
// Description: Drives comment extraction, tag rules, and normalization.
// Purpose: Produce test descriptions for files, directory trees, and suites.
// Dependencies: requires-logic, testgate-config, testgate-core, walkdir
// ============================================================================

//! ## Overview
//! [`TestScanner`] owns a [`ScanConfig`] and a [`DiagnosticSink`]. File-level
//! problems (unreadable file, unknown extension, file outside the root) skip
//! the file and are reported once. Tag problems are recorded on the produced
//! description and also reported as `parse` diagnostics. A test URL seen
//! twice keeps the first description and reports the second.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use requires_logic::KnownNames;
use testgate_config::DirectoryProperties;
use testgate_config::SuiteConfig;
use testgate_core::Diagnostic;
use testgate_core::DiagnosticKind;
use testgate_core::DiagnosticSink;
use testgate_core::TestDescription;
use walkdir::WalkDir;

use crate::comment::CommentStrategy;
use crate::comment::CommentStrategyRegistry;
use crate::error::ScanError;
use crate::normalize::DeclarationSite;
use crate::normalize::normalize;
use crate::rules::Declaration;
use crate::rules::RuleContext;
use crate::tag::TagEntry;
use crate::tag::declares_test;
use crate::tag::parse_tags;

// ============================================================================
// SECTION: Scan Configuration
// ============================================================================

/// Explicit inputs for one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Suite root directory.
    pub root: PathBuf,
    /// Suite configuration.
    pub suite: SuiteConfig,
    /// Extension to comment strategy table.
    pub registry: CommentStrategyRegistry,
    /// Property names `@requires` may reference.
    pub known_names: KnownNames,
    /// Directory names skipped while walking.
    pub ignored_directories: BTreeSet<String>,
}

impl ScanConfig {
    /// Builds the scan inputs for a suite rooted at `root`.
    #[must_use]
    pub fn for_suite(root: impl Into<PathBuf>, suite: SuiteConfig) -> Self {
        Self {
            root: root.into(),
            registry: CommentStrategyRegistry::for_suite(&suite),
            known_names: KnownNames::for_suite(suite.requires_properties.iter().cloned()),
            ignored_directories: suite.ignored_directory_names(),
            suite,
        }
    }

    /// Returns the rule inputs for files in a directory.
    #[must_use]
    pub fn rules_for(&self, dir: &DirectoryProperties) -> RuleContext {
        RuleContext {
            known_names: self.known_names.clone(),
            bug_validation: self.suite.bug_validation,
            keys: dir.keys.clone(),
        }
    }

    /// Returns the `/`-separated root-relative form of a path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::OutsideRoot`] when `path` is not under the root.
    pub fn relative_path(&self, path: &Path) -> Result<String, ScanError> {
        let relative = path.strip_prefix(&self.root).map_err(|_| ScanError::OutsideRoot {
            path: path.to_path_buf(),
        })?;
        Ok(relative.components().map(|part| part.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/"))
    }
}

// ============================================================================
// SECTION: Scanner
// ============================================================================

/// Scans source files into normalized test descriptions.
pub struct TestScanner<S> {
    /// Scan inputs.
    config: ScanConfig,
    /// Diagnostic destination.
    sink: S,
}

impl<S: DiagnosticSink> TestScanner<S> {
    /// Creates a scanner.
    #[must_use]
    pub const fn new(config: ScanConfig, sink: S) -> Self {
        Self {
            config,
            sink,
        }
    }

    /// Returns the scan inputs.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Returns the diagnostic sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Scans one file without reporting file-level errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] when the file lies outside the root, has no
    /// registered comment strategy, or cannot be read.
    pub fn try_scan_file(&self, path: &Path) -> Result<Vec<TestDescription>, ScanError> {
        let relative_path = self.config.relative_path(path)?;
        let strategy = self.config.registry.strategy_for_path(path).ok_or_else(|| ScanError::UnknownExtension {
            path: path.to_path_buf(),
        })?;
        let source = fs::read_to_string(path).map_err(|err| ScanError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let dir = relative_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        let properties = self.config.suite.properties_for(dir);
        Ok(self.parse_source(path, &relative_path, &source, strategy, &properties))
    }

    /// Scans one file; file-level errors are reported and yield no tests.
    pub fn scan_file(&self, path: &Path) -> Vec<TestDescription> {
        match self.try_scan_file(path) {
            Ok(tests) => {
                self.report_tag_errors(&tests);
                tests
            }
            Err(err) => {
                self.sink.report(&scan_diagnostic(&err));
                Vec::new()
            }
        }
    }

    /// Scans files and directory trees, dropping duplicate URLs.
    pub fn scan_paths(&self, paths: &[PathBuf]) -> Vec<TestDescription> {
        let mut seen = BTreeSet::new();
        let mut tests = Vec::new();
        for path in paths {
            let files = if path.is_dir() { self.walk(path) } else { vec![path.clone()] };
            for file in files {
                for test in self.scan_file(&file) {
                    if seen.insert(test.url.clone()) {
                        tests.push(test);
                    } else {
                        self.sink.report(
                            &Diagnostic::new(DiagnosticKind::Duplicate, "duplicate test; later declaration dropped")
                                .with_path(&test.file)
                                .with_url(&test.url),
                        );
                    }
                }
            }
        }
        tests
    }

    /// Scans every test file under the suite root.
    pub fn scan_suite(&self) -> Vec<TestDescription> {
        self.scan_paths(&[self.config.root.clone()])
    }

    /// Parses already-read source text.
    #[must_use]
    pub fn parse_source(
        &self,
        path: &Path,
        relative_path: &str,
        source: &str,
        strategy: &dyn CommentStrategy,
        dir: &DirectoryProperties,
    ) -> Vec<TestDescription> {
        let rules = self.config.rules_for(dir);
        let declarations: Vec<(usize, Vec<TagEntry>)> = strategy
            .extract(source)
            .into_iter()
            .map(|comment| (comment.line, parse_tags(&comment.text)))
            .filter(|(_, entries)| declares_test(entries))
            .collect();
        let multiple = declarations.len() > 1;
        let declarations: Vec<(usize, Declaration)> = declarations
            .into_iter()
            .map(|(line, entries)| (line, Declaration::from_entries(&entries, &rules)))
            .collect();
        let mut used: BTreeSet<String> =
            declarations.iter().filter_map(|(_, declaration)| declaration.explicit_id()).map(str::to_string).collect();
        declarations
            .into_iter()
            .enumerate()
            .map(|(index, (line, declaration))| {
                let id = match declaration.explicit_id() {
                    Some(id) => Some(id.to_string()),
                    None if multiple => Some(synthetic_id(index, &mut used)),
                    None => None,
                };
                let site = DeclarationSite {
                    file: path,
                    relative_path,
                    line,
                };
                normalize(declaration, site, id, dir)
            })
            .collect()
    }

    /// Collects scannable files under a directory in name order.
    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let ignored = &self.config.ignored_directories;
        let mut files = Vec::new();
        let walker = WalkDir::new(dir).sort_by_file_name().into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !ignored.contains(entry.file_name().to_string_lossy().as_ref())
        });
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.config.registry.supports(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => {
                    let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                    self.sink.report(&Diagnostic::new(DiagnosticKind::Io, err.to_string()).with_path(path));
                }
            }
        }
        files
    }

    /// Reports recorded tag errors as `parse` diagnostics.
    fn report_tag_errors(&self, tests: &[TestDescription]) {
        for test in tests {
            if let Some(error) = &test.error {
                self.sink.report(
                    &Diagnostic::new(DiagnosticKind::Parse, error.clone()).with_path(&test.file).with_url(&test.url),
                );
            }
        }
    }
}

/// Returns `id<index>`, or the next free number when an explicit id took it.
fn synthetic_id(index: usize, used: &mut BTreeSet<String>) -> String {
    let mut number = index;
    loop {
        let id = format!("id{number}");
        if used.insert(id.clone()) {
            return id;
        }
        number += 1;
    }
}

/// Converts a file-level error into a diagnostic.
fn scan_diagnostic(err: &ScanError) -> Diagnostic {
    let kind = match err {
        ScanError::Io {
            ..
        } => DiagnosticKind::Io,
        ScanError::UnknownExtension {
            ..
        }
        | ScanError::OutsideRoot {
            ..
        } => DiagnosticKind::Parse,
    };
    Diagnostic::new(kind, err.to_string()).with_path(err.path())
}
