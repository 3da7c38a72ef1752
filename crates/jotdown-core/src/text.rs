//! Text helpers for note titles and status-bar counts.

/// Title used when nothing can be derived from a note's text.
pub const UNTITLED: &str = "Untitled";

/// Maximum title length, in characters, for non-heading first lines.
pub const MAX_TITLE_CHARS: usize = 50;

/// Derive a display title from markdown text.
///
/// Takes the trimmed first line. A heading line loses its `#` marks; any
/// other line is cut to [`MAX_TITLE_CHARS`] characters. Falls back to
/// [`UNTITLED`] when the result is empty.
///
/// # Examples
///
/// ```
/// use jotdown_core::text::derive_title;
///
/// assert_eq!(derive_title("# Hello World\nbody"), "Hello World");
/// assert_eq!(derive_title(""), "Untitled");
/// ```
#[must_use]
pub fn derive_title(raw_text: &str) -> String {
    let first_line = raw_text
        .split('\n')
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let title: String = if first_line.starts_with('#') {
        first_line.trim_start_matches('#').trim_start().to_string()
    } else {
        first_line.chars().take(MAX_TITLE_CHARS).collect()
    };

    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Count whitespace-separated words.
#[must_use]
pub fn word_count(raw_text: &str) -> usize {
    raw_text.split_whitespace().count()
}

/// Count characters (Unicode scalar values).
#[must_use]
pub fn char_count(raw_text: &str) -> usize {
    raw_text.chars().count()
}
