//! Terminal output sanitization
//!
//! Prompt text comes straight from transcript files. Anything printed by the
//! human-readable `stats` report goes through [`sanitize_for_terminal`] first so
//! escape sequences in a transcript cannot move the cursor, recolor the
//! terminal, or set its title. JSON output is escaped by the serializer and
//! needs no extra handling.

use std::sync::LazyLock;

use regex::Regex;

/// CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL|ST`) sequences
static ESCAPE_SEQUENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
        .expect("escape sequence pattern is valid")
});

/// Remove escape sequences and control characters, keeping tabs and newlines
///
/// # Examples
///
/// ```
/// use agent_log_analytics::utils::terminal::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mRed\x1b[0m text"), "Red text");
/// ```
pub fn sanitize_for_terminal(text: &str) -> String {
    ESCAPE_SEQUENCE
        .replace_all(text, "")
        .chars()
        .filter(|ch| !ch.is_control() || matches!(ch, '\t' | '\n'))
        .collect()
}

/// Sanitized text folded onto one line, for list-style output
pub fn single_line(text: &str) -> String {
    sanitize_for_terminal(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_color_codes() {
        assert_eq!(sanitize_for_terminal("\x1b[1m\x1b[31mBold Red\x1b[0m\x1b[32m Green\x1b[0m"), "Bold Red Green");
    }

    #[test]
    fn test_strips_cursor_movement() {
        assert_eq!(sanitize_for_terminal("\x1b[2J\x1b[H Cleared"), " Cleared");
    }

    #[test]
    fn test_strips_title_sequence() {
        assert_eq!(sanitize_for_terminal("\x1b]0;pwned\x07after"), "after");
        assert_eq!(sanitize_for_terminal("\x1b]2;title\x1b\\after"), "after");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_for_terminal("Alert!\x07 back\x08\r"), "Alert! back");
    }

    #[test]
    fn test_keeps_unicode_tabs_and_newlines() {
        assert_eq!(sanitize_for_terminal("Hi 👋\n\tthere"), "Hi 👋\n\tthere");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("fix\n  the\tbug \x1b[31m!\x1b[0m"), "fix the bug !");
        assert_eq!(single_line(""), "");
    }
}
