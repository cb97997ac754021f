// crates/testgate-tags/src/comment.rs
// ============================================================================
// Module: Comment Strategies
// Description: Comment extraction per source-file style.
// Purpose: Pull top-level comments out of source text for tag parsing.
// Dependencies: testgate-config
// ============================================================================

//! ## Overview
//! A [`CommentStrategy`] turns source text into the ordered list of comments a
//! test declaration may live in. Three strategies are provided:
//! - [`BlockComments`]: `/* ... */`, skipping `//` comments and literals.
//! - [`ShellComments`]: maximal runs of `#` lines, ignoring `#!` lines.
//! - [`HtmlComments`]: `<!-- ... -->`.
//!
//! [`CommentStrategyRegistry`] selects a strategy by file extension. It is an
//! explicit value built from suite configuration and passed to the scanner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use testgate_config::CommentStyle;
use testgate_config::SuiteConfig;

// ============================================================================
// SECTION: Comments
// ============================================================================

/// One extracted comment with decorations stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// 1-based line where the comment starts.
    pub line: usize,
    /// Comment body, one source line per text line.
    pub text: String,
}

/// Extracts comments from source text.
pub trait CommentStrategy: Send + Sync {
    /// Returns the comments in source order.
    fn extract(&self, source: &str) -> Vec<Comment>;
}

// ============================================================================
// SECTION: Block Comments
// ============================================================================

/// `/* ... */` comments as used by Java, `.jasm`, and `.jcod` sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockComments;

impl CommentStrategy for BlockComments {
    fn extract(&self, source: &str) -> Vec<Comment> {
        let bytes = source.as_bytes();
        let mut comments = Vec::new();
        let mut line = 1;
        let mut index = 0;
        while index < bytes.len() {
            match bytes[index] {
                b'\n' => {
                    line += 1;
                    index += 1;
                }
                b'/' if bytes.get(index + 1) == Some(&b'/') => {
                    while index < bytes.len() && bytes[index] != b'\n' {
                        index += 1;
                    }
                }
                b'/' if bytes.get(index + 1) == Some(&b'*') => {
                    let start_line = line;
                    let body_start = index + 2;
                    let body_end = find(bytes, body_start, b"*/").unwrap_or(bytes.len());
                    let body = &source[body_start .. body_end];
                    line += body.matches('\n').count();
                    index = (body_end + 2).min(bytes.len());
                    comments.push(Comment {
                        line: start_line,
                        text: strip_block_decoration(body),
                    });
                }
                quote @ (b'"' | b'\'') => {
                    index += 1;
                    while index < bytes.len() && bytes[index] != quote && bytes[index] != b'\n' {
                        if bytes[index] == b'\\' && bytes.get(index + 1) != Some(&b'\n') {
                            index += 1;
                        }
                        index += 1;
                    }
                    if bytes.get(index) == Some(&quote) {
                        index += 1;
                    }
                }
                _ => index += 1,
            }
        }
        comments
    }
}

/// Strips leading whitespace and `*` from each line of a block comment.
fn strip_block_decoration(body: &str) -> String {
    body.lines()
        .map(|line| line.trim_start().trim_start_matches('*').trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Finds `needle` in `bytes` at or after `from`.
fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes.get(from ..)?.windows(needle.len()).position(|window| window == needle).map(|offset| from + offset)
}

// ============================================================================
// SECTION: Shell Comments
// ============================================================================

/// Runs of consecutive `#` lines as used by shell scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellComments;

impl CommentStrategy for ShellComments {
    fn extract(&self, source: &str) -> Vec<Comment> {
        let mut comments = Vec::new();
        let mut current: Option<Comment> = None;
        for (offset, raw) in source.lines().enumerate() {
            let trimmed = raw.trim_start();
            let body = trimmed.strip_prefix('#').filter(|_| !trimmed.starts_with("#!"));
            match (body, current.as_mut()) {
                (Some(body), Some(comment)) => {
                    comment.text.push('\n');
                    comment.text.push_str(body.trim());
                }
                (Some(body), None) => {
                    current = Some(Comment {
                        line: offset + 1,
                        text: body.trim().to_string(),
                    });
                }
                (None, _) => comments.extend(current.take()),
            }
        }
        comments.extend(current);
        comments
    }
}

// ============================================================================
// SECTION: HTML Comments
// ============================================================================

/// `<!-- ... -->` comments as used by applet tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlComments;

impl CommentStrategy for HtmlComments {
    fn extract(&self, source: &str) -> Vec<Comment> {
        let bytes = source.as_bytes();
        let mut comments = Vec::new();
        let mut index = 0;
        while let Some(start) = find(bytes, index, b"<!--") {
            let body_start = start + 4;
            let body_end = find(bytes, body_start, b"-->").unwrap_or(bytes.len());
            comments.push(Comment {
                line: source[.. start].matches('\n').count() + 1,
                text: source[body_start .. body_end].lines().map(str::trim).collect::<Vec<_>>().join("\n"),
            });
            index = (body_end + 3).min(bytes.len());
        }
        comments
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Extensions recognized without configuration.
const DEFAULT_EXTENSIONS: &[(&str, CommentStyle)] = &[
    ("java", CommentStyle::Block),
    ("jasm", CommentStyle::Block),
    ("jcod", CommentStyle::Block),
    ("sh", CommentStyle::Shell),
    ("html", CommentStyle::Html),
];

/// Maps file extensions to comment strategies.
#[derive(Clone)]
pub struct CommentStrategyRegistry {
    /// Strategies keyed by extension without the leading dot.
    strategies: BTreeMap<String, Arc<dyn CommentStrategy>>,
}

impl CommentStrategyRegistry {
    /// Creates a registry with no extensions.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in extensions.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (extension, style) in DEFAULT_EXTENSIONS {
            registry.register_style(extension, *style);
        }
        registry
    }

    /// Creates the registry for a suite: defaults plus configured overrides.
    #[must_use]
    pub fn for_suite(suite: &SuiteConfig) -> Self {
        let mut registry = Self::with_defaults();
        for (extension, style) in &suite.extensions {
            registry.register_style(extension, *style);
        }
        registry
    }

    /// Registers a built-in style for an extension.
    pub fn register_style(&mut self, extension: &str, style: CommentStyle) {
        self.register(extension, strategy_for(style));
    }

    /// Registers a strategy for an extension, replacing any previous one.
    pub fn register(&mut self, extension: &str, strategy: Arc<dyn CommentStrategy>) {
        self.strategies.insert(extension.trim_start_matches('.').to_string(), strategy);
    }

    /// Returns the strategy for a file, selected by its extension.
    #[must_use]
    pub fn strategy_for_path(&self, path: &Path) -> Option<&dyn CommentStrategy> {
        let extension = path.extension()?.to_str()?;
        self.strategies.get(extension).map(|strategy| &**strategy)
    }

    /// Returns true when the extension is registered.
    #[must_use]
    pub fn supports(&self, path: &Path) -> bool {
        self.strategy_for_path(path).is_some()
    }

    /// Returns the registered extensions.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }
}

impl Default for CommentStrategyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CommentStrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommentStrategyRegistry").field("extensions", &self.strategies.keys()).finish()
    }
}

/// Returns the shared strategy for a built-in style.
fn strategy_for(style: CommentStyle) -> Arc<dyn CommentStrategy> {
    match style {
        CommentStyle::Block => Arc::new(BlockComments),
        CommentStyle::Shell => Arc::new(ShellComments),
        CommentStyle::Html => Arc::new(HtmlComments),
    }
}
