//! Formatting utilities for CLI output.

use serde_json::Value;

use crate::preferences::{ChangeKind, PreferenceChange};

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";
    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
}

/// Renders a preference value as compact JSON.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

/// Renders a preference change as a single line.
///
/// Additions start with `+`, removals with `-` and modifications with `~`.
pub fn format_change(change: &PreferenceChange, color: bool) -> String {
    let old = change.old_value.as_ref().map(format_value).unwrap_or_default();
    let new = change.new_value.as_ref().map(format_value).unwrap_or_default();

    let (marker, paint, text) = match change.kind() {
        ChangeKind::Added => ("+", Colors::GREEN, format!("{} = {new}", change.key)),
        ChangeKind::Removed => ("-", Colors::RED, format!("{} (was {old})", change.key)),
        ChangeKind::Modified => ("~", Colors::YELLOW, format!("{}: {old} -> {new}", change.key)),
    };

    if color {
        format!("{paint}{marker}{} {text}", Colors::RESET)
    } else {
        format!("{marker} {text}")
    }
}

/// Formats error messages with styling
pub fn format_error(text: &str) -> String {
    format!("{}{}error:{} {text}", Colors::BOLD, Colors::RED, Colors::RESET)
}

/// Formats secondary information with muted styling
pub fn format_note(text: &str) -> String {
    format!("{}{text}{}", Colors::DIM, Colors::RESET)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use serde_json::json;

    use super::*;

    #[test]
    fn values_render_as_json() {
        assert_eq!(format_value(&json!("on")), "\"on\"");
        assert_eq!(format_value(&json!(14)), "14");
        assert_eq!(format_value(&json!([1, 2])), "[1,2]");
        assert_eq!(format_value(&json!(null)), "null");
    }

    #[test]
    fn changes_render_without_color() {
        let now = Instant::now();

        assert_eq!(
            format_change(&PreferenceChange::added("wordWrap", json!(true), now), false),
            "+ wordWrap = true"
        );
        assert_eq!(
            format_change(&PreferenceChange::removed("tabSize", json!(4), now), false),
            "- tabSize (was 4)"
        );
        assert_eq!(
            format_change(
                &PreferenceChange::modified("lineNumbers", json!("on"), json!("off"), now),
                false
            ),
            "~ lineNumbers: \"on\" -> \"off\""
        );
    }
}
