//! jotdown-core - Core library for Jotdown
//!
//! This crate contains the note/tab store, the markdown render pipeline,
//! key-value persistence, view-mode and scroll-sync state, and JSON
//! import/export used by Jotdown front ends.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod render;
pub mod schedule;
pub mod services;
pub mod storage;
pub mod store;
pub mod text;
pub mod util;
pub mod view;

pub use config::EditorConfig;
pub use error::{Error, Result};
pub use models::{Note, NoteId, Settings, ThemeMode};
pub use render::{RenderOptions, RenderOutput, RenderPipeline};
pub use services::EditorService;
pub use storage::{KeyValueStore, MemoryStore, Persistence};
pub use store::{NoteStats, NoteStore};
pub use view::{ViewController, ViewMode, ViewPreset, ViewState};
