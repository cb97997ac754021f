// crates/testgate-core/src/description.rs
// ============================================================================
// Module: Test Descriptions
// Description: Normalized metadata records for declared tests.
// Purpose: Carry typed test metadata from the scanner to filters and reports.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestDescription`] is the normalized record of one test declaration. It
//! is built once by the tag scanner and never mutated afterwards; problems
//! found later (for example requirement faults during selection) are kept in
//! side tables keyed by [`TestDescription::url`].
//!
//! The typed fields are the source of truth. [`TestDescription::parameter`]
//! renders the flat name to value view used by report layers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Timeout applied to a timed action that declares none.
pub const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 120;

/// Action names that run under a timeout.
const TIMED_ACTIONS: &[&str] = &["main", "shell", "junit", "testng", "driver", "applet", "compile"];

// ============================================================================
// SECTION: Actions
// ============================================================================

/// One step of a test's `run` sequence, e.g. `main/othervm/timeout=60 Foo a b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action name (`main`, `shell`, `compile`, `build`, ...).
    pub name: String,
    /// Options following the name, without the leading `/`.
    pub options: Vec<String>,
    /// Remaining argument text.
    pub args: String,
    /// True when written by the test author, false when assumed by default.
    pub user_specified: bool,
}

impl Action {
    /// Parses an action line. Returns `None` for blank text.
    #[must_use]
    pub fn parse(text: &str, user_specified: bool) -> Option<Self> {
        let text = text.trim();
        let (head, args) = match text.split_once(char::is_whitespace) {
            Some((head, args)) => (head, args.trim()),
            None => (text, ""),
        };
        let mut parts = head.split('/');
        let name = parts.next().filter(|name| !name.is_empty())?;
        Some(Self {
            name: name.to_string(),
            options: parts.filter(|option| !option.is_empty()).map(str::to_string).collect(),
            args: args.to_string(),
            user_specified,
        })
    }

    /// Builds an action with the given name and arguments and no options.
    #[must_use]
    pub fn new(name: impl Into<String>, args: impl Into<String>, user_specified: bool) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            args: args.into(),
            user_specified,
        }
    }

    /// Returns true when the option appears as a flag or as `name=value`.
    #[must_use]
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|option| option == name || option.split_once('=').is_some_and(|(key, _)| key == name))
    }

    /// Returns the value of a `name=value` option.
    #[must_use]
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.options.iter().find_map(|option| match option.split_once('=') {
            Some((key, value)) if key == name => Some(value),
            _ => None,
        })
    }

    /// Returns the declared `/timeout=N`, if present and numeric.
    #[must_use]
    pub fn declared_timeout(&self) -> Option<u64> {
        self.option_value("timeout").and_then(|value| value.parse().ok())
    }

    /// Returns true when the action runs under a timeout.
    #[must_use]
    pub fn is_timed(&self) -> bool {
        TIMED_ACTIONS.contains(&self.name.as_str())
    }

    /// Effective timeout in seconds: declared, else the default for timed actions.
    #[must_use]
    pub fn effective_timeout(&self) -> Option<u64> {
        if !self.is_timed() {
            return None;
        }
        Some(self.declared_timeout().unwrap_or(DEFAULT_ACTION_TIMEOUT_SECS))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for option in &self.options {
            write!(f, "/{option}")?;
        }
        if !self.args.is_empty() {
            write!(f, " {}", self.args)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Module Specifications
// ============================================================================

/// Access modifier on a `@modules` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleModifier {
    /// `open`: the package is opened to the test.
    Open,
    /// `private`: private access is required.
    Private,
    /// `+open`: opened in addition to being exported.
    PlusOpen,
}

impl ModuleModifier {
    /// Parses a modifier token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "open" => Some(Self::Open),
            "private" => Some(Self::Private),
            "+open" => Some(Self::PlusOpen),
            _ => None,
        }
    }

    /// Returns the source token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Private => "private",
            Self::PlusOpen => "+open",
        }
    }
}

/// One `@modules` entry: `module[/package[:modifier,...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleSpec {
    /// Module name.
    pub module: String,
    /// Package within the module.
    pub package: Option<String>,
    /// Modifiers applied to the package.
    pub modifiers: Vec<ModuleModifier>,
}

impl ModuleSpec {
    /// Returns true when the given modifier is present.
    #[must_use]
    pub fn has_modifier(&self, modifier: ModuleModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

impl fmt::Display for ModuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module)?;
        if let Some(package) = &self.package {
            write!(f, "/{package}")?;
            let mut separator = ':';
            for modifier in &self.modifiers {
                write!(f, "{separator}{}", modifier.as_str())?;
                separator = ',';
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Test Description
// ============================================================================

/// Normalized metadata for one declared test.
///
/// # Invariants
/// - `(file, id)` is unique within a suite; `url` encodes both.
/// - `max_timeout` is `0` when no action declares a timeout or any declares `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDescription {
    /// Absolute path of the declaring file.
    pub file: PathBuf,
    /// Suite-root-relative path using `/` separators.
    pub relative_path: String,
    /// 1-based line of the declaring comment.
    pub line: usize,
    /// Explicit or synthetic id; absent when the file declares a single test.
    pub id: Option<String>,
    /// Root-relative path plus `#id` when an id is present.
    pub url: String,
    /// Test title.
    pub title: String,
    /// Declaring file name.
    pub source: String,
    /// Ordered run actions.
    pub run: Vec<Action>,
    /// Bug ids.
    pub bugs: Vec<String>,
    /// Explicit and implicit keywords.
    pub keywords: BTreeSet<String>,
    /// Library directories in search order.
    pub libraries: Vec<String>,
    /// Required modules.
    pub modules: Vec<ModuleSpec>,
    /// Requirement expression text; repeats already conjoined.
    pub requires: Option<String>,
    /// Whether preview features are enabled.
    pub enable_preview: bool,
    /// Largest declared action timeout in seconds; `0` is unlimited.
    pub max_timeout: u64,
    /// Summary text.
    pub summary: Option<String>,
    /// Author text.
    pub author: Option<String>,
    /// Comment text.
    pub comment: Option<String>,
    /// First recorded parse error.
    pub error: Option<String>,
}

impl TestDescription {
    /// Creates a description for a declaration at `line` with empty metadata.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, relative_path: impl Into<String>, line: usize, id: Option<String>) -> Self {
        let file = file.into();
        let relative_path = relative_path.into();
        let source = file.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
        Self {
            url: test_url(&relative_path, id.as_deref()),
            file,
            relative_path,
            line,
            id,
            title: String::new(),
            source,
            run: Vec::new(),
            bugs: Vec::new(),
            keywords: BTreeSet::new(),
            libraries: Vec::new(),
            modules: Vec::new(),
            requires: None,
            enable_preview: false,
            max_timeout: 0,
            summary: None,
            author: None,
            comment: None,
            error: None,
        }
    }

    /// Returns true when a parse error was recorded.
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Returns true when the keyword is present.
    #[must_use]
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    /// Returns the flat parameter view for a declaration name.
    ///
    /// Lists render space-separated; `run` renders one action per line.
    /// Empty lists and absent values yield `None`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "source" => Some(self.source.clone()),
            "run" => join_nonempty(self.run.iter().map(ToString::to_string), "\n"),
            "bug" => join_nonempty(self.bugs.iter().cloned(), " "),
            "keywords" => join_nonempty(self.keywords.iter().cloned(), " "),
            "library" => join_nonempty(self.libraries.iter().cloned(), " "),
            "modules" => join_nonempty(self.modules.iter().map(ToString::to_string), " "),
            "requires" => self.requires.clone(),
            "enablePreview" => Some(self.enable_preview.to_string()),
            "maxTimeout" => Some(self.max_timeout.to_string()),
            "summary" => self.summary.clone(),
            "author" => self.author.clone(),
            "comment" => self.comment.clone(),
            "error" => self.error.clone(),
            "id" => self.id.clone(),
            _ => None,
        }
    }
}

/// Joins items, or `None` when there are none.
fn join_nonempty(items: impl Iterator<Item = String>, separator: &str) -> Option<String> {
    let items: Vec<String> = items.collect();
    if items.is_empty() { None } else { Some(items.join(separator)) }
}

/// Builds a test URL from a root-relative path and optional id.
#[must_use]
pub fn test_url(relative_path: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{relative_path}#{id}"),
        None => relative_path.to_string(),
    }
}
