//! Note import/export.
//!
//! JSON exports wrap the notes in a versioned [`ExportDocument`] and can be
//! imported back. Markdown exports are one-way: each note with a frontmatter
//! block.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Note;
use crate::storage::KeyValueStore;
use crate::store::{check_notes, NoteStore};

/// Version written to and accepted from export documents.
pub const FORMAT_VERSION: u32 = 1;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Versioned backup of every note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub format_version: u32,
    pub notes: Vec<Note>,
}

/// Notes from an import that passed validation.
///
/// Only [`import`] and [`import_json`] build this, so
/// [`NoteStore::replace_all`] never sees an empty or duplicated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedNotes {
    notes: Vec<Note>,
}

impl ImportedNotes {
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always `false` for a validated import
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[must_use]
    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }
}

/// Snapshot every note in tab order.
#[must_use]
pub fn export<S: KeyValueStore>(store: &NoteStore<S>) -> ExportDocument {
    ExportDocument {
        format_version: FORMAT_VERSION,
        notes: store.notes().to_vec(),
    }
}

/// Render the export document as pretty-printed JSON.
pub fn export_json<S: KeyValueStore>(store: &NoteStore<S>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&export(store))?)
}

/// Validate an export document.
pub fn import(document: ExportDocument) -> Result<ImportedNotes> {
    if document.format_version != FORMAT_VERSION {
        return Err(reject(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            document.format_version
        )));
    }

    check_notes(&document.notes).map_err(reject)?;

    Ok(ImportedNotes {
        notes: document.notes,
    })
}

/// Parse and validate an export document from JSON.
pub fn import_json(payload: &str) -> Result<ImportedNotes> {
    let document: ExportDocument = serde_json::from_str(payload)
        .map_err(|error| reject(format!("not an export document: {error}")))?;
    import(document)
}

fn reject(reason: String) -> Error {
    tracing::warn!("Rejected import: {}", reason);
    Error::InvalidFormat(reason)
}

/// Render notes in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(notes: &[Note]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", note.id);
        let _ = writeln!(output, "title: {}", note.title);
        let _ = writeln!(output, "created_at: {}", note.created_at);
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        output.push_str(&note.raw_text);
        output.push('\n');
    }

    output
}

/// Render every note in the store in the selected format.
pub fn render_notes_export<S: KeyValueStore>(
    store: &NoteStore<S>,
    format: ExportFormat,
) -> Result<String> {
    match format {
        ExportFormat::Json => export_json(store),
        ExportFormat::Markdown => Ok(render_markdown_export(store.notes())),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("jotdown-export-{timestamp_ms}.{}", format.extension())
}
