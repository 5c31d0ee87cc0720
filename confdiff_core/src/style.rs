//! ANSI decoration for rendered diffs, applied only at output time.

const RESET: &str = "\x1b[0m";
const BOLD_CYAN: &str = "\x1b[1;36m";
const CYAN: &str = "\x1b[36m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";

/// Colorize a unified diff line by line. Returns the input untouched when
/// `enabled` is false.
///
/// `---`/`+++` lines are file headers only before the first `@@`; inside a
/// hunk they are removed or added lines.
pub fn colorize(diff: &str, enabled: bool) -> String {
    if !enabled {
        return diff.to_string();
    }

    let mut result = String::with_capacity(diff.len() + diff.len() / 4);
    let mut in_header = true;
    for line in diff.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };

        if body.starts_with("@@") {
            in_header = false;
        }

        let color = if in_header && (body.starts_with("---") || body.starts_with("+++")) {
            Some(BOLD_CYAN)
        } else if body.starts_with("@@") {
            Some(YELLOW)
        } else if body.starts_with('+') {
            Some(GREEN)
        } else if body.starts_with('-') {
            Some(RED)
        } else {
            None
        };

        match color {
            Some(color) => {
                result.push_str(color);
                result.push_str(body);
                result.push_str(RESET);
                result.push_str(newline);
            }
            None => result.push_str(line),
        }
    }

    result
}

/// Wrap a single message in a color, or return it unchanged
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if !enabled {
        return text.to_string();
    }
    let code = match color {
        Color::Cyan => CYAN,
        Color::Yellow => YELLOW,
        Color::Green => GREEN,
        Color::Red => RED,
    };
    format!("{}{}{}", code, text, RESET)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Cyan,
    Yellow,
    Green,
    Red,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "--- a\n+++ b\n@@ -1,2 +1,2 @@\n ctx\n-old\n+new\n";

    #[test]
    fn test_disabled_is_identity() {
        assert_eq!(colorize(DIFF, false), DIFF);
        assert_eq!(paint("x", Color::Red, false), "x");
    }

    #[test]
    fn test_line_colors() {
        let colored = colorize(DIFF, true);
        assert!(colored.starts_with("\x1b[1;36m--- a\x1b[0m\n\x1b[1;36m+++ b\x1b[0m\n"));
        assert!(colored.contains("\x1b[33m@@ -1,2 +1,2 @@\x1b[0m\n"));
        assert!(colored.contains("\n ctx\n"));
        assert!(colored.contains("\x1b[31m-old\x1b[0m\n"));
        assert!(colored.ends_with("\x1b[32m+new\x1b[0m\n"));
    }

    #[test]
    fn test_dashed_body_lines_not_headers() {
        let diff = "--- a\n+++ b\n@@ -1,1 +1,1 @@\n--- old rule\n+++ new rule\n";
        let colored = colorize(diff, true);
        assert!(colored.starts_with("\x1b[1;36m--- a\x1b[0m\n\x1b[1;36m+++ b\x1b[0m\n"));
        assert!(colored.contains("\x1b[31m--- old rule\x1b[0m\n"));
        assert!(colored.ends_with("\x1b[32m+++ new rule\x1b[0m\n"));
    }

    #[test]
    fn test_no_newline_marker_uncolored() {
        let diff = "--- a\n+++ b\n@@ -1,1 +1,1 @@\n-x\n+x\n\\ No newline at end of file\n";
        assert!(colorize(diff, true).ends_with("\x1b[0m\n\\ No newline at end of file\n"));
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(colorize("+x", true), "\x1b[32m+x\x1b[0m");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("ok", Color::Green, true), "\x1b[32mok\x1b[0m");
    }
}
