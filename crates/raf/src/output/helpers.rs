//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use ra_filter::Value;

/// Widest a table column may grow before cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Pads a string with spaces to `width` characters.
pub fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - len))
    }
}

/// Renders a record value as a single table cell.
///
/// Missing values render empty; newlines fold to spaces.
pub fn format_cell(value: Option<&Value>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    value
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a table header cell.
pub fn format_header(label: &str, width: usize, use_colors: bool) -> String {
    let padded = pad(label, width);
    if use_colors {
        padded.bold().to_string()
    } else {
        padded
    }
}

/// Dims secondary text when colors are on.
pub fn dim(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}
