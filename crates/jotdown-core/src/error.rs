//! Error types for jotdown-core

use thiserror::Error;

use crate::models::NoteId;

/// Result type alias using jotdown-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jotdown-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// An operation referenced a note id that is not in the store
    #[error("Note not found: {0}")]
    NotFound(NoteId),

    /// Attempted to delete the only remaining note
    #[error("Cannot delete the last remaining note")]
    LastNote,

    /// Import document failed validation
    #[error("Invalid import format: {0}")]
    InvalidFormat(String),

    /// Writing to the key-value store failed; in-memory state is kept
    #[error("Failed to persist state: {0}")]
    PersistenceWrite(String),

    /// Markdown conversion failed and the preview fell back to plain text
    #[error("Markdown rendering degraded: {0}")]
    RenderDegraded(String),

    /// Invalid editor configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// `SQLite` error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
