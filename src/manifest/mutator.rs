//! Rewrites the value portion of one located line.
//!
//! The line is split by a single structural regex into indent, key, colon
//! spacing, value, and trailing rest; only the value is replaced. The old
//! value's quoting style is re-applied and anything after the value (inline
//! comment, trailing whitespace, a CR) is preserved verbatim.

use std::sync::LazyLock;

use regex::Regex;

static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        ^(?P<indent>[\ \t]*)
        (?P<lead>(?:-\ )*)
        (?P<key>"[^"]*"|'[^']*'|[^:\#\s][^:]*?)
        (?P<colon>:[\ \t]+)
        (?P<value>"[^"]*"|'[^']*'|[^\ \t\#][^\#]*?)
        (?P<rest>[\ \t]*(?:\#.*)?\r?)$
        "#,
    )
    .expect("line pattern is valid")
});

/// Replace the value of a `key: value` line, keeping everything else
/// byte-identical.
///
/// Lines that do not match the expected shape (e.g. a bare sequence entry
/// `- 1.2.3`) fall back to replacing the final non-whitespace, non-comment
/// token.
pub fn replace_value(line: &str, new_value: &str) -> String {
    if let Some(caps) = LINE_RE.captures(line) {
        let old_value = &caps["value"];
        let replacement = requote(old_value, new_value);
        return format!(
            "{}{}{}{}{}{}",
            &caps["indent"], &caps["lead"], &caps["key"], &caps["colon"], replacement, &caps["rest"],
        );
    }

    replace_last_token(line, new_value)
}

/// Wrap the replacement in the same quote character as the old value
fn requote(old_value: &str, new_value: &str) -> String {
    if old_value.len() >= 2 && old_value.starts_with('"') && old_value.ends_with('"') {
        format!("\"{new_value}\"")
    } else if old_value.len() >= 2 && old_value.starts_with('\'') && old_value.ends_with('\'') {
        format!("'{new_value}'")
    } else {
        new_value.to_string()
    }
}

fn replace_last_token(line: &str, new_value: &str) -> String {
    // Split off an inline comment: a '#' at line start or after whitespace.
    let mut comment_start = None;
    let mut prev_is_space = true;
    for (i, ch) in line.char_indices() {
        if ch == '#' && prev_is_space {
            comment_start = Some(i);
            break;
        }
        prev_is_space = ch.is_whitespace();
    }
    let (body, tail) = match comment_start {
        Some(i) => line.split_at(i),
        None => (line, ""),
    };

    let trimmed = body.trim_end();
    let trailing_ws = &body[trimmed.len()..];
    let token_start = trimmed
        .rfind(|c: char| c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    if token_start >= trimmed.len() {
        return line.to_string();
    }

    let replacement = requote(&trimmed[token_start..], new_value);
    format!("{}{}{}{}", &trimmed[..token_start], replacement, trailing_ws, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("targetRevision: 15.9.0", "16.0.0", "targetRevision: 16.0.0")]
    #[case(
        "    targetRevision: \"15.9.0\"  # pinned",
        "16.0.0",
        "    targetRevision: \"16.0.0\"  # pinned"
    )]
    #[case("  version: '1.2.3'", "2.0.0", "  version: '2.0.0'")]
    #[case("version: 1.2.3   ", "2.0.0", "version: 2.0.0   ")]
    #[case("  - targetRevision: 1.0.0", "1.1.0", "  - targetRevision: 1.1.0")]
    #[case("\"my.key\": 1.0.0", "2.0.0", "\"my.key\": 2.0.0")]
    #[case("version:    1.0.0", "2.0.0", "version:    2.0.0")]
    fn replace_value_rewrites_only_the_value(
        #[case] line: &str,
        #[case] new_value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(replace_value(line, new_value), expected);
    }

    #[test]
    fn replace_value_preserves_carriage_return() {
        assert_eq!(
            replace_value("version: 1.0.0\r", "2.0.0"),
            "version: 2.0.0\r"
        );
    }

    #[rstest]
    #[case("  - 1.0.0", "2.0.0", "  - 2.0.0")]
    #[case("  - \"1.0.0\"  # keep", "2.0.0", "  - \"2.0.0\"  # keep")]
    fn replace_value_falls_back_to_last_token(
        #[case] line: &str,
        #[case] new_value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(replace_value(line, new_value), expected);
    }

    #[test]
    fn replace_value_is_byte_identical_for_equal_versions() {
        let line = "    targetRevision: \"15.9.0\"  # pinned";
        assert_eq!(replace_value(line, "15.9.0"), line);
    }

    #[test]
    fn unquoted_value_stays_unquoted() {
        assert_eq!(
            replace_value("targetRevision: 15.9.0", "16.0.0"),
            "targetRevision: 16.0.0"
        );
    }
}
