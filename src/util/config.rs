//! Configuration file parsing utilities.
//!
//! This module provides helpers for parsing configuration files with common
//! patterns like comment skipping and key-value parsing.

/// What: Check if a line should be skipped (empty or comment).
///
/// Inputs:
/// - `line`: Line to check
///
/// Output:
/// - `true` if the line should be skipped, `false` otherwise
///
/// Details:
/// - Skips empty lines and lines starting with `#`, `//`, or `;`
#[must_use]
pub fn skip_comment_or_empty(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || trimmed.starts_with(';')
}

/// What: Parse a key-value pair from a line.
///
/// Inputs:
/// - `line`: Line containing `key<sep>value`
/// - `sep`: Separator character (`=` for settings, `:` for substitutions)
///
/// Output:
/// - `Some((key, value))` if parsing succeeds, `None` otherwise
///
/// Details:
/// - Splits on the first `sep` character
/// - Trims whitespace from both key and value
#[must_use]
pub fn parse_key_value(line: &str, sep: char) -> Option<(String, String)> {
    let (key, value) = line.trim().split_once(sep)?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// What: Strip a trailing ` # comment` from a value.
///
/// Inputs:
/// - `value`: Raw value text
///
/// Output:
/// - Value without the inline comment, trimmed
///
/// Details:
/// - Only a `#` preceded by whitespace starts a comment, so URLs with fragments survive.
#[must_use]
pub fn strip_inline_comment(value: &str) -> &str {
    value
        .find(" #")
        .or_else(|| value.find("\t#"))
        .map_or(value, |pos| &value[..pos])
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Comment and blank lines are skipped.
    ///
    /// Inputs:
    /// - Blank, `#`, `//`, `;` and content lines.
    ///
    /// Output:
    /// - Only the content line is kept.
    fn config_skip_comment_or_empty() {
        assert!(skip_comment_or_empty("   "));
        assert!(skip_comment_or_empty("# note"));
        assert!(skip_comment_or_empty("// note"));
        assert!(skip_comment_or_empty("; note"));
        assert!(!skip_comment_or_empty("key = value"));
    }

    #[test]
    /// What: Key/value parsing splits on the first separator only.
    ///
    /// Inputs:
    /// - `a = b = c` with `=`, `Free Game: Gratis` with `:`, and a line without separator.
    ///
    /// Output:
    /// - Trimmed pairs; `None` without separator.
    fn config_parse_key_value() {
        assert_eq!(
            parse_key_value(" a = b = c ", '='),
            Some(("a".into(), "b = c".into()))
        );
        assert_eq!(
            parse_key_value("Free Game: Gratis", ':'),
            Some(("Free Game".into(), "Gratis".into()))
        );
        assert_eq!(parse_key_value("novalue", '='), None);
    }

    #[test]
    /// What: Inline comments are removed but `#` inside values survives.
    ///
    /// Inputs:
    /// - `8 # attempts` and `https://x/#frag`.
    ///
    /// Output:
    /// - `8` and the unchanged URL.
    fn config_strip_inline_comment() {
        assert_eq!(strip_inline_comment("8 # attempts"), "8");
        assert_eq!(strip_inline_comment("https://x/#frag"), "https://x/#frag");
    }
}
