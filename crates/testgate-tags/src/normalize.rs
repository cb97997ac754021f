// crates/testgate-tags/src/normalize.rs
// ============================================================================
// Module: Normalization
// Description: Turns a validated declaration into a test description.
// Purpose: Fill defaults and derive keywords and timeouts exactly once.
// Dependencies: testgate-config, testgate-core, crate::{error, rules}
// ============================================================================

//! ## Overview
//! Normalization runs once per declaration, after every tag rule has been
//! applied. It fills the title and the default run action, derives implicit
//! keywords from the assembled run sequence, computes the largest timeout,
//! and injects directory-level module and preview defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use testgate_config::DirectoryProperties;
use testgate_core::Action;
use testgate_core::TestDescription;

use crate::error::TagError;
use crate::rules::Declaration;
use crate::rules::parse_module_spec;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Action names that become keywords.
const KEYWORD_ACTIONS: &[&str] = &["shell", "junit", "testng", "driver", "ignore"];

/// Action options that become keywords.
const KEYWORD_OPTIONS: &[&str] = &["othervm", "manual", "native"];

// ============================================================================
// SECTION: Declaration Site
// ============================================================================

/// Where a declaration was found.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationSite<'a> {
    /// Absolute path of the declaring file.
    pub file: &'a Path,
    /// Suite-root-relative path with `/` separators.
    pub relative_path: &'a str,
    /// 1-based line of the declaring comment.
    pub line: usize,
}

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Builds the normalized description for one declaration.
#[must_use]
pub fn normalize(
    mut declaration: Declaration,
    site: DeclarationSite<'_>,
    id: Option<String>,
    dir: &DirectoryProperties,
) -> TestDescription {
    let mut desc = TestDescription::new(site.file, site.relative_path, site.line, id);

    if declaration.actions.is_empty() {
        match default_action(&desc.source, site.relative_path, dir) {
            Some(action) => declaration.actions.push(action),
            None => declaration.record(TagError::NoDefaultAction {
                source_name: desc.source.clone(),
            }),
        }
    }

    desc.summary = join_text(&declaration.summary);
    desc.author = join_text(&declaration.author);
    desc.comment = join_text(&declaration.comment);
    desc.title = match desc.summary.as_deref() {
        Some(summary) => first_sentence(summary).to_string(),
        None => desc.source.clone(),
    };

    desc.keywords = implicit_keywords(&declaration.actions).collect();
    desc.keywords.extend(declaration.bugs.iter().map(|bug| bug_keyword(bug)));
    desc.keywords.extend(declaration.keys.iter().cloned());
    desc.max_timeout = max_timeout(&declaration.actions);

    desc.modules = match declaration.modules {
        Some(modules) => modules,
        None => dir.modules.iter().filter_map(|token| parse_module_spec(token).ok()).collect(),
    };
    desc.enable_preview = declaration.enable_preview.unwrap_or(dir.enable_preview);
    desc.requires = conjoin(&declaration.requires);

    desc.run = declaration.actions;
    desc.bugs = declaration.bugs;
    desc.libraries = declaration.libraries;
    desc.error = declaration.error.map(|error| error.to_string());
    desc
}

/// Infers the run action for a declaration without action tags.
fn default_action(source: &str, relative_path: &str, dir: &DirectoryProperties) -> Option<Action> {
    let (stem, extension) = source.rsplit_once('.')?;
    if extension == "java" {
        if let Some(root) = &dir.testng_root {
            return Some(Action::new("testng", runner_class(relative_path, root), false));
        }
        if let Some(root) = &dir.junit_root {
            return Some(Action::new("junit", runner_class(relative_path, root), false));
        }
        return Some(Action::new("main", stem, false));
    }
    match extension {
        "sh" => Some(Action::new("shell", source, false)),
        "html" => Some(Action::new("applet", source, false)),
        _ => None,
    }
}

/// Returns the class name of a source file relative to a runner root.
fn runner_class(relative_path: &str, root: &str) -> String {
    let within = if root.is_empty() {
        relative_path
    } else {
        relative_path.strip_prefix(root).map_or(relative_path, |rest| rest.trim_start_matches('/'))
    };
    within.strip_suffix(".java").unwrap_or(within).replace('/', ".")
}

/// Yields keywords implied by action names and options.
fn implicit_keywords(actions: &[Action]) -> impl Iterator<Item = String> + '_ {
    actions.iter().flat_map(|action| {
        let by_name = KEYWORD_ACTIONS.contains(&action.name.as_str()).then(|| action.name.clone());
        let by_option = KEYWORD_OPTIONS.iter().filter(|option| action.has_option(option)).map(|option| (*option).to_string());
        by_name.into_iter().chain(by_option)
    })
}

/// Returns the `bug<digits>` keyword for a bug id.
fn bug_keyword(bug: &str) -> String {
    let digits = bug.rsplit_once('-').map_or(bug, |(_, number)| number);
    format!("bug{digits}")
}

/// Largest declared `/timeout=N`; `0` when none is declared or any is `0`.
fn max_timeout(actions: &[Action]) -> u64 {
    let mut max = 0;
    for timeout in actions.iter().filter_map(Action::declared_timeout) {
        if timeout == 0 {
            return 0;
        }
        max = max.max(timeout);
    }
    max
}

/// Returns the text up to and including the first sentence terminator.
fn first_sentence(text: &str) -> &str {
    let bytes = text.as_bytes();
    for (index, byte) in bytes.iter().enumerate() {
        if *byte == b'.' && bytes.get(index + 1).is_none_or(u8::is_ascii_whitespace) {
            return &text[..= index];
        }
    }
    text
}

/// Joins repeated free-text values with a space.
fn join_text(values: &[String]) -> Option<String> {
    if values.is_empty() { None } else { Some(values.join(" ")) }
}

/// Conjoins repeated requirement expressions.
fn conjoin(expressions: &[String]) -> Option<String> {
    match expressions {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(many.iter().map(|text| format!("({text})")).collect::<Vec<_>>().join(" & ")),
    }
}
