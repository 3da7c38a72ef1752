//! End-to-end editing session against a file-backed store.

use std::time::Duration;

use jotdown_core::db::SqliteStore;
use jotdown_core::export::{export, import};
use jotdown_core::view::{Pane, PaneMetrics};
use jotdown_core::{
    EditorConfig, EditorService, Error, NoteStore, Persistence, RenderPipeline, ViewController,
    ViewPreset, ViewState,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tokio::time::Instant;

fn open_store(path: &std::path::Path, config: &EditorConfig) -> NoteStore<SqliteStore> {
    NoteStore::open(Persistence::new(SqliteStore::open(path).unwrap()), config)
}

#[test]
fn session_survives_restart() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("jotdown.db");
    let config = EditorConfig::from_json(r#"{"autosave_delay_ms": 500}"#).unwrap();

    let (ideas, todo) = {
        let mut store = open_store(&db_path, &config);
        let welcome = store.active_id();
        let ideas = store.create_with_text("# Ideas\nwrite more rust");
        let todo = store.create_with_text("- [ ] ship it");
        store.rename(&todo, "Todo").unwrap();
        store.delete(&welcome).unwrap();
        store.select(&ideas).unwrap();
        store.flush().unwrap();
        (ideas, todo)
    };

    let store = open_store(&db_path, &config);
    let titles: Vec<&str> = store.notes().iter().map(|note| note.title.as_str()).collect();
    assert_eq!(titles, vec!["Ideas", "Todo"]);
    assert_eq!(store.active_id(), ideas);
    assert_eq!(store.stats(&ideas).unwrap().words, 5);

    let html = RenderPipeline::default().render(&store.get(&todo).unwrap().raw_text);
    assert!(html.contains(r#"<input type="checkbox" disabled="" class="task-list-item-checkbox">"#));
}

#[test]
fn failed_import_leaves_store_alone() {
    let tmp = tempdir().unwrap();
    let config = EditorConfig::default();
    let mut store = open_store(&tmp.path().join("jotdown.db"), &config);
    store.create_with_text("keep me");

    let mut document = export(&store);
    document.format_version = 99;
    assert!(matches!(import(document), Err(Error::InvalidFormat(_))));
    assert_eq!(store.len(), 2);

    let mut document = export(&store);
    document.notes.reverse();
    store.replace_all(import(document).unwrap());
    assert_eq!(store.active_note().raw_text, "keep me");
}

#[test]
fn view_controller_follows_toolbar_and_scroll() {
    let config = EditorConfig::default();
    let mut view = ViewController::from_config(&config, ViewState::hidden());
    let now = Instant::now();
    let editor = PaneMetrics::new(300.0, 800.0, 200.0);
    let preview = PaneMetrics::new(0.0, 1400.0, 200.0);

    assert!(view.on_scroll(Pane::Editor, editor, preview, now).is_none());

    assert_eq!(view.toggle_preview(), ViewPreset::Split);
    let command = view.on_scroll(Pane::Editor, editor, preview, now).unwrap();
    assert_eq!(command.pane, Pane::Preview);
    assert!((command.offset - 600.0).abs() < 1e-9);

    // The echo from the driven preview is swallowed during the cooldown.
    let echo = view.on_scroll(
        Pane::Preview,
        PaneMetrics::new(600.0, 1400.0, 200.0),
        editor,
        now + Duration::from_millis(10),
    );
    assert!(echo.is_none());

    assert_eq!(view.toggle_view_mode(), ViewPreset::Full);
    assert_eq!(view.back_to_split(), ViewPreset::Split);
}

#[tokio::test(start_paused = true)]
async fn service_autosaves_to_sqlite() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("jotdown.db");
    let config = EditorConfig::default();

    let service = EditorService::start(open_store(&db_path, &config), RenderPipeline::default());
    let id = service.create_with_text("# Autosaved").await;
    tokio::time::sleep(config.autosave_delay() + Duration::from_millis(1)).await;
    assert!(!service.with_store(NoteStore::is_dirty).await);

    service.update_text(&id, "# Saved on exit").await.unwrap();
    service.shutdown().await.unwrap();

    let reopened = open_store(&db_path, &config);
    assert_eq!(reopened.active_note().title, "Saved on exit");
}
