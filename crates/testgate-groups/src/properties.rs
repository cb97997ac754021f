// crates/testgate-groups/src/properties.rs
// ============================================================================
// Module: Properties Reader
// Description: Minimal `name = value` properties-file reader.
// Purpose: Read group definition files.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Supports the subset of the properties format group files use:
//! - blank lines and lines starting with `#` or `!` are skipped;
//! - a line ending in an odd number of `\` continues on the next line, whose
//!   leading whitespace is dropped;
//! - the key ends at the first `=`, `:`, or whitespace; one `=` or `:` and
//!   the whitespace around it separate the key from the value.
//!
//! A key repeated within one file keeps its last value.

/// One property with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property key.
    pub key: String,
    /// Property value, continuation lines joined.
    pub value: String,
    /// 1-based line of the key.
    pub line: usize,
}

/// Parses properties text, keeping the last value of repeated keys.
#[must_use]
pub fn parse_properties(text: &str) -> Vec<Property> {
    let mut properties: Vec<Property> = Vec::new();
    for (line, logical) in logical_lines(text) {
        let (key, value) = split_entry(&logical);
        let property = Property {
            key: key.to_string(),
            value: value.to_string(),
            line,
        };
        match properties.iter_mut().find(|existing| existing.key == property.key) {
            Some(existing) => *existing = property,
            None => properties.push(property),
        }
    }
    properties
}

/// Joins continuation lines and drops comments and blank lines.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;
    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim_start();
        let (start, mut buffer) = match pending.take() {
            Some(open) => open,
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                (index + 1, String::new())
            }
        };
        if continues(trimmed) {
            buffer.push_str(&trimmed[.. trimmed.len() - 1]);
            pending = Some((start, buffer));
        } else {
            buffer.push_str(trimmed);
            lines.push((start, buffer));
        }
    }
    lines.extend(pending);
    lines
}

/// Returns true when the line ends in an odd number of backslashes.
fn continues(line: &str) -> bool {
    line.bytes().rev().take_while(|byte| *byte == b'\\').count() % 2 == 1
}

/// Splits a logical line into key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let key_end = line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()).unwrap_or(line.len());
    let key = &line[.. key_end];
    let mut rest = line[key_end ..].trim_start();
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start();
    }
    (key, rest.trim_end())
}

#[cfg(test)]
mod tests {
    use super::parse_properties;

    #[test]
    fn comments_continuations_and_separators() {
        let text = "# comment\n! also comment\n\na = x y \\\n    z\nb: :a\nc  -lib/p\nd\n";
        let props = parse_properties(text);
        let pairs: Vec<(&str, &str)> = props.iter().map(|p| (p.key.as_str(), p.value.as_str())).collect();
        assert_eq!(pairs, [("a", "x y z"), ("b", ":a"), ("c", "-lib/p"), ("d", "")]);
        assert_eq!(props[0].line, 4);
        assert_eq!(props[1].line, 6);
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let props = parse_properties("a = one\na = two\n");
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].value, "two");
    }

    #[test]
    fn escaped_backslash_does_not_continue() {
        let props = parse_properties("a = x\\\\\nb = y\n");
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].value, "x\\\\");
    }
}
