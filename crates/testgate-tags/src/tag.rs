// crates/testgate-tags/src/tag.rs
// ============================================================================
// Module: Tag Stream
// Description: Splits a comment body into `@name value` entries.
// Purpose: Produce the flat tag stream the per-tag rules consume.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A tag starts on a line whose first non-blank character is `@` followed by
//! a letter. Its value runs to the next such line. Text before the first tag
//! is ignored. Tag names may carry options (`@compile/fail`); they stay part
//! of the name here and are split by the rules.

/// One `@name value` pair from a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Tag name without the `@`, options included.
    pub name: String,
    /// Value lines joined with `\n`, each trimmed.
    pub value: String,
    /// 0-based line offset of the tag within the comment.
    pub line_offset: usize,
}

impl TagEntry {
    /// Returns the name without options.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name.split('/').next().unwrap_or_default()
    }

    /// Returns the options attached to the name.
    pub fn name_options(&self) -> impl Iterator<Item = &str> {
        self.name.split('/').skip(1).filter(|option| !option.is_empty())
    }

    /// Returns the value with line breaks folded to single spaces.
    #[must_use]
    pub fn flat_value(&self) -> String {
        self.value.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Splits a comment body into tag entries.
#[must_use]
pub fn parse_tags(comment: &str) -> Vec<TagEntry> {
    let mut entries: Vec<TagEntry> = Vec::new();
    for (offset, line) in comment.lines().enumerate() {
        let trimmed = line.trim();
        if let Some((name, rest)) = tag_start(trimmed) {
            entries.push(TagEntry {
                name: name.to_string(),
                value: rest.trim().to_string(),
                line_offset: offset,
            });
            continue;
        }
        let Some(entry) = entries.last_mut() else {
            continue;
        };
        if trimmed.is_empty() {
            continue;
        }
        if !entry.value.is_empty() {
            entry.value.push('\n');
        }
        entry.value.push_str(trimmed);
    }
    entries
}

/// Returns true when the comment declares a test.
#[must_use]
pub fn declares_test(entries: &[TagEntry]) -> bool {
    entries.first().is_some_and(|entry| entry.name == "test")
}

/// Splits `@name rest` when the line starts a tag.
fn tag_start(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix('@')?;
    if !body.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let end = body.find(char::is_whitespace).unwrap_or(body.len());
    Some((&body[.. end], &body[end ..]))
}

#[cfg(test)]
mod tests {
    use super::declares_test;
    use super::parse_tags;

    #[test]
    fn values_continue_until_next_tag() {
        let entries = parse_tags("preamble\n@test\n@summary first line\n  second line\n@run main Foo");
        assert!(declares_test(&entries));
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].value, "first line\nsecond line");
        assert_eq!(entries[1].flat_value(), "first line second line");
        assert_eq!(entries[2].line_offset, 4);
    }

    #[test]
    fn tag_options_split_from_name() {
        let entries = parse_tags("@compile/fail/ref=out.txt Bad.java");
        assert_eq!(entries[0].base_name(), "compile");
        assert_eq!(entries[0].name_options().collect::<Vec<_>>(), ["fail", "ref=out.txt"]);
    }

    #[test]
    fn at_signs_inside_text_are_not_tags() {
        let entries = parse_tags("@test\n@summary uses @Override\n@ 1 loose");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value, "uses @Override\n@ 1 loose");
    }
}
