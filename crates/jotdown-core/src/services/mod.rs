//! Async services for hosts running a tokio runtime.

mod editor;

pub use editor::EditorService;
