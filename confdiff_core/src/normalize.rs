use confdiff_common::ComparisonConfig;

/// Filter text input line by line according to the comment and blank-line
/// rules in `config`.
///
/// Surviving lines keep their original relative order. A trailing `#`
/// fragment is cut only when the `#` is not the first character of the line.
pub fn normalize_lines<'a>(content: &'a str, config: &ComparisonConfig) -> Vec<&'a str> {
    let mut result = Vec::new();

    for line in content.split('\n') {
        if config.ignore_blank_lines && line.trim().is_empty() {
            continue;
        }

        let mut line = line;
        if config.ignore_comments {
            if line.trim().starts_with('#') {
                continue;
            }
            if let Some(idx) = line.find('#').filter(|&idx| idx > 0) {
                line = line[..idx].trim_end_matches(|c: char| c == ' ' || c == '\t');
            }
        }

        result.push(line);
    }

    result
}

/// Normalize `content` and join the surviving lines back into one blob
pub fn normalize_text(content: &str, config: &ComparisonConfig) -> String {
    normalize_lines(content, config).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_strip_comments_and_blanks() {
        let config = ComparisonConfig::default();
        let lines = normalize_lines("foo=1\n# comment\n\nbar=2\n", &config);
        assert_eq!(lines, vec!["foo=1", "bar=2"]);
    }

    #[test]
    fn test_indented_comment_dropped() {
        let config = ComparisonConfig::default();
        let lines = normalize_lines("a: 1\n  # full comment\nb: 2", &config);
        assert_eq!(lines, vec!["a: 1", "b: 2"]);
    }

    #[test]
    fn test_trailing_comment_truncated() {
        let config = ComparisonConfig::default();
        let lines = normalize_lines("key: value # trailing\nother: x\t# tab", &config);
        assert_eq!(lines, vec!["key: value", "other: x"]);
    }

    #[test]
    fn test_whitespace_only_line_dropped() {
        let config = ComparisonConfig::default().with_ignore_comments(false);
        let lines = normalize_lines("a\n   \t \nb", &config);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_keep_comments_when_disabled() {
        let config = ComparisonConfig::default().with_ignore_comments(false);
        let lines = normalize_lines("# header\nkey=1 # note\n", &config);
        assert_eq!(lines, vec!["# header", "key=1 # note"]);
    }

    #[test]
    fn test_keep_blank_lines_when_disabled() {
        let config = ComparisonConfig::default().with_ignore_blank_lines(false);
        let lines = normalize_lines("a\n\nb\n", &config);
        assert_eq!(lines, vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_order_preserved() {
        let config = ComparisonConfig::default();
        let lines = normalize_lines("z=1\na=2\nm=3", &config);
        assert_eq!(lines, vec!["z=1", "a=2", "m=3"]);
    }

    #[test]
    fn test_normalize_text_joins_lines() {
        let config = ComparisonConfig::default();
        assert_eq!(normalize_text("x=1\n\n# c\ny=2\n", &config), "x=1\ny=2");
    }
}
