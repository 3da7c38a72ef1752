//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::text::derive_title;

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A note, shown as one tab in the editor
///
/// `raw_text` is the source of truth. `title` is kept materialized: it is
/// re-derived from `raw_text` on every text change unless the user renamed
/// the note, in which case `title_overridden` is set and the title sticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Display title
    pub title: String,
    /// Markdown source
    pub raw_text: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Whether `title` was set explicitly by the user
    #[serde(default)]
    pub title_overridden: bool,
}

impl Note {
    /// Create a new note with the given markdown text
    #[must_use]
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            id: NoteId::new(),
            title: derive_title(&raw_text),
            raw_text,
            created_at: chrono::Utc::now().timestamp_millis(),
            title_overridden: false,
        }
    }

    /// Replace the text, re-deriving the title unless it was overridden
    pub fn set_text(&mut self, raw_text: impl Into<String>) {
        self.raw_text = raw_text.into();
        if !self.title_overridden {
            self.title = derive_title(&self.raw_text);
        }
    }

    /// Pin an explicit title. Blank titles are ignored and return `false`.
    pub fn set_title_override(&mut self, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        self.title = title.to_string();
        self.title_overridden = true;
        true
    }

    /// Drop an explicit title and go back to deriving it from the text
    pub fn clear_title_override(&mut self) {
        self.title_overridden = false;
        self.title = derive_title(&self.raw_text);
    }
}
