// crates/testgate-tags/src/rules.rs
// ============================================================================
// Module: Tag Rules
// Description: Per-tag validation and accumulation into a declaration.
// Purpose: Apply each tag's rule independently, keeping the first error.
// Dependencies: requires-logic, testgate-config, testgate-core, crate::{error, tag}
// ============================================================================

//! ## Overview
//! [`Declaration`] accumulates the tags of one test-declaring comment. Rules
//! are independent: a bad tag records a [`TagError`] (the first one is kept)
//! and the remaining tags are still applied, so the test is still produced
//! and its problem is reported rather than hidden.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use requires_logic::KnownNames;
use requires_logic::parse_expr;
use testgate_config::normalize_key;
use testgate_core::Action;
use testgate_core::ModuleModifier;
use testgate_core::ModuleSpec;

use crate::error::TagError;
use crate::tag::TagEntry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tags that contribute an action to the run sequence.
const ACTION_TAGS: &[&str] = &["run", "clean", "compile", "build", "ignore"];

/// Action tags whose value may be empty.
const VALUELESS_ACTIONS: &[&str] = &["ignore"];

// ============================================================================
// SECTION: Rule Context
// ============================================================================

/// Suite-supplied inputs the rules validate against.
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Property names `@requires` may reference.
    pub known_names: KnownNames,
    /// Whether `@bug` tokens are validated.
    pub bug_validation: bool,
    /// Valid `@key` tokens; `None` makes `@key` an unknown tag.
    pub keys: Option<BTreeSet<String>>,
}

impl Default for RuleContext {
    fn default() -> Self {
        Self {
            known_names: KnownNames::builtin(),
            bug_validation: true,
            keys: None,
        }
    }
}

// ============================================================================
// SECTION: Declaration
// ============================================================================

/// Validated tag values of one declaration, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// Value of the `@test` tag.
    pub test_value: String,
    /// Actions in declaration order.
    pub actions: Vec<Action>,
    /// Bug ids.
    pub bugs: Vec<String>,
    /// Accepted key tokens, normalized.
    pub keys: Vec<String>,
    /// Library directories in search order.
    pub libraries: Vec<String>,
    /// Declared modules; `None` when `@modules` never appeared.
    pub modules: Option<Vec<ModuleSpec>>,
    /// Requirement expressions, one per `@requires`.
    pub requires: Vec<String>,
    /// Declared `@enablePreview`.
    pub enable_preview: Option<bool>,
    /// `@summary` values.
    pub summary: Vec<String>,
    /// `@author` values.
    pub author: Vec<String>,
    /// `@comment` values.
    pub comment: Vec<String>,
    /// First recorded error.
    pub error: Option<TagError>,
    /// True once `@key` has been applied.
    key_seen: bool,
}

impl Declaration {
    /// Builds a declaration from a comment's tag entries.
    #[must_use]
    pub fn from_entries(entries: &[TagEntry], ctx: &RuleContext) -> Self {
        let mut declaration = Self::default();
        for entry in entries {
            declaration.apply(entry, ctx);
        }
        declaration
    }

    /// Returns the explicit `id=<name>` from the `@test` value.
    #[must_use]
    pub fn explicit_id(&self) -> Option<&str> {
        self.test_value
            .split_whitespace()
            .find_map(|token| token.strip_prefix("id="))
            .filter(|id| !id.is_empty())
    }

    /// Records an error unless one is already recorded.
    pub fn record(&mut self, error: TagError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Applies one tag.
    pub fn apply(&mut self, entry: &TagEntry, ctx: &RuleContext) {
        let base = entry.base_name();
        if ACTION_TAGS.contains(&base) {
            self.apply_action(entry, base);
            return;
        }
        if entry.name.contains('/') {
            self.record(TagError::UnknownTag {
                name: entry.name.clone(),
            });
            return;
        }
        match base {
            "test" => self.test_value = entry.flat_value(),
            "bug" => self.apply_bug(entry, ctx),
            "key" if ctx.keys.is_some() => self.apply_key(entry, ctx),
            "modules" => self.apply_modules(entry),
            "library" => self.apply_library(entry),
            "requires" => self.apply_requires(entry, ctx),
            "enablePreview" => self.apply_enable_preview(entry),
            "summary" => push_text(&mut self.summary, entry),
            "author" => push_text(&mut self.author, entry),
            "comment" => push_text(&mut self.comment, entry),
            _ => self.record(TagError::UnknownTag {
                name: entry.name.clone(),
            }),
        }
    }

    /// `@run`, `@clean`, `@compile`, `@build`, `@ignore`.
    fn apply_action(&mut self, entry: &TagEntry, base: &str) {
        let value = entry.flat_value();
        if value.is_empty() && !VALUELESS_ACTIONS.contains(&base) {
            self.record(TagError::EmptyValue {
                tag: base.to_string(),
            });
            return;
        }
        let action = if base == "run" {
            match Action::parse(&value, true) {
                Some(action) => action,
                None => {
                    self.record(TagError::InvalidAction {
                        text: value,
                    });
                    return;
                }
            }
        } else {
            let mut action = Action::new(base, value, true);
            action.options = entry.name_options().map(str::to_string).collect();
            action
        };
        if let Some(timeout) = action.option_value("timeout")
            && timeout.parse::<u64>().is_err()
        {
            self.record(TagError::InvalidTimeout {
                value: timeout.to_string(),
            });
        }
        self.actions.push(action);
    }

    /// `@bug`: every token checked when validation is on.
    fn apply_bug(&mut self, entry: &TagEntry, ctx: &RuleContext) {
        let tokens: Vec<&str> = entry.value.split([' ', '\n', '\t', ',']).filter(|token| !token.is_empty()).collect();
        if tokens.is_empty() {
            self.record(TagError::EmptyValue {
                tag: "bug".to_string(),
            });
            return;
        }
        for token in tokens {
            if ctx.bug_validation && !valid_bug_id(token) {
                self.record(TagError::InvalidBug {
                    token: token.to_string(),
                });
                continue;
            }
            self.bugs.push(token.to_string());
        }
    }

    /// `@key`: at most once; unknown tokens are dropped individually.
    fn apply_key(&mut self, entry: &TagEntry, ctx: &RuleContext) {
        if self.key_seen {
            self.record(TagError::DuplicateTag {
                tag: "key".to_string(),
            });
            return;
        }
        self.key_seen = true;
        let Some(valid) = &ctx.keys else {
            return;
        };
        for token in entry.value.split_whitespace() {
            let key = normalize_key(token);
            if valid.contains(&key) {
                self.keys.push(key);
            } else {
                self.record(TagError::InvalidKey {
                    token: token.to_string(),
                });
            }
        }
    }

    /// `@modules`: a malformed token discards the whole value.
    fn apply_modules(&mut self, entry: &TagEntry) {
        let mut parsed = Vec::new();
        for token in entry.value.split_whitespace() {
            match parse_module_spec(token) {
                Ok(spec) => parsed.push(spec),
                Err(error) => {
                    self.record(error);
                    return;
                }
            }
        }
        self.modules.get_or_insert_with(Vec::new).extend(parsed);
    }

    /// `@library`: must precede every action tag.
    fn apply_library(&mut self, entry: &TagEntry) {
        if !self.actions.is_empty() {
            self.record(TagError::LibraryAfterAction);
            return;
        }
        let before = self.libraries.len();
        self.libraries.extend(entry.value.split_whitespace().map(str::to_string));
        if self.libraries.len() == before {
            self.record(TagError::EmptyValue {
                tag: "library".to_string(),
            });
        }
    }

    /// `@requires`: well-formed and naming only known properties.
    fn apply_requires(&mut self, entry: &TagEntry, ctx: &RuleContext) {
        let text = entry.flat_value();
        let checked = parse_expr(&text).and_then(|expr| expr.validate_names(&ctx.known_names));
        match checked {
            Ok(()) => self.requires.push(text),
            Err(err) => self.record(TagError::Requires {
                reason: err.to_string(),
            }),
        }
    }

    /// `@enablePreview`: empty means true.
    fn apply_enable_preview(&mut self, entry: &TagEntry) {
        match entry.flat_value().as_str() {
            "" | "true" => self.enable_preview = Some(true),
            "false" => self.enable_preview = Some(false),
            other => self.record(TagError::InvalidEnablePreview {
                value: other.to_string(),
            }),
        }
    }
}

/// Appends free text, folded to one line.
fn push_text(target: &mut Vec<String>, entry: &TagEntry) {
    let text = entry.flat_value();
    if !text.is_empty() {
        target.push(text);
    }
}

// ============================================================================
// SECTION: Token Validators
// ============================================================================

/// Returns true for `NNNNNNN`, `PROJECT-NNNNNNN`, or `14NNNNNN`.
#[must_use]
pub fn valid_bug_id(token: &str) -> bool {
    let all_digits = |text: &str| text.bytes().all(|b| b.is_ascii_digit());
    if token.len() == 7 && all_digits(token) {
        return true;
    }
    if token.len() == 8 && token.starts_with("14") && all_digits(token) {
        return true;
    }
    match token.split_once('-') {
        Some((project, number)) => {
            !project.is_empty()
                && project.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
                && project.bytes().next().is_some_and(|b| b.is_ascii_uppercase())
                && number.len() == 7
                && all_digits(number)
        }
        None => false,
    }
}

/// Parses `module[/package[:modifier,...]]`.
///
/// # Errors
///
/// Returns [`TagError::InvalidModule`] naming what is malformed.
pub fn parse_module_spec(token: &str) -> Result<ModuleSpec, TagError> {
    let invalid = |reason: &'static str| TagError::InvalidModule {
        token: token.to_string(),
        reason,
    };
    let (module, rest) = match token.split_once('/') {
        Some((module, rest)) => (module, Some(rest)),
        None => (token, None),
    };
    if !is_qualified_name(module) {
        return Err(invalid("bad module name"));
    }
    let Some(rest) = rest else {
        return Ok(ModuleSpec {
            module: module.to_string(),
            package: None,
            modifiers: Vec::new(),
        });
    };
    let (package, modifiers) = match rest.split_once(':') {
        Some((package, modifiers)) => (package, Some(modifiers)),
        None => (rest, None),
    };
    if !is_qualified_name(package) {
        return Err(invalid("bad package name"));
    }
    let mut parsed = Vec::new();
    if let Some(modifiers) = modifiers {
        for modifier in modifiers.split(',') {
            parsed.push(ModuleModifier::parse(modifier).ok_or_else(|| invalid("bad modifier"))?);
        }
    }
    Ok(ModuleSpec {
        module: module.to_string(),
        package: Some(package.to_string()),
        modifiers: parsed,
    })
}

/// Returns true for dotted identifiers such as `jdk.internal.misc`.
fn is_qualified_name(text: &str) -> bool {
    !text.is_empty()
        && text.split('.').all(|part| {
            part.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
                && part.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::parse_module_spec;
    use super::valid_bug_id;

    #[test]
    fn bug_forms() {
        assert!(valid_bug_id("1234567"));
        assert!(valid_bug_id("ABC-1234567"));
        assert!(valid_bug_id("JDK-8012345"));
        assert!(valid_bug_id("14123456"));
        assert!(!valid_bug_id("123"));
        assert!(!valid_bug_id("12345678"));
        assert!(!valid_bug_id("abc-1234567"));
        assert!(!valid_bug_id("-1234567"));
    }

    #[test]
    fn module_spec_shapes() {
        assert!(parse_module_spec("java.base").is_ok());
        assert!(parse_module_spec("java.base/jdk.internal.misc:open,+open").is_ok());
        assert!(parse_module_spec("bad/").is_err());
        assert!(parse_module_spec("/pkg").is_err());
        assert!(parse_module_spec("java.base/p:public").is_err());
        assert!(parse_module_spec("java.base/p:").is_err());
    }
}
