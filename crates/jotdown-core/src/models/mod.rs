//! Data models for Jotdown

mod note;
mod settings;

pub use note::{Note, NoteId};
pub use settings::{Settings, ThemeMode, DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
