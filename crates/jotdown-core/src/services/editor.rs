//! Shared editor service for tokio hosts.

use std::sync::Arc;

use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;

use crate::export::{self, ImportedNotes};
use crate::models::{Note, NoteId, Settings};
use crate::render::{RenderOutput, RenderPipeline};
use crate::storage::KeyValueStore;
use crate::store::{NoteStats, NoteStore};
use crate::{Error, Result};

/// Thread-safe handle to a [`NoteStore`] with background autosave.
///
/// Every mutation wakes the autosave task, which sleeps until the store's
/// pending deadline and flushes. Failed writes are published through
/// [`EditorService::save_errors`] so the host can warn the user; the next
/// successful write clears the error. Call [`EditorService::shutdown`] before
/// exit for the final flush.
pub struct EditorService<S> {
    store: Arc<Mutex<NoteStore<S>>>,
    renderer: Arc<RenderPipeline>,
    wake: Arc<Notify>,
    stop: watch::Sender<bool>,
    save_error: Arc<watch::Sender<Option<String>>>,
    autosave_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<S> Clone for EditorService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            renderer: Arc::clone(&self.renderer),
            wake: Arc::clone(&self.wake),
            stop: self.stop.clone(),
            save_error: Arc::clone(&self.save_error),
            autosave_task: Arc::clone(&self.autosave_task),
        }
    }
}

impl<S: KeyValueStore + Send + 'static> EditorService<S> {
    /// Wrap a store and start the autosave task on the current runtime.
    #[must_use]
    pub fn start(store: NoteStore<S>, renderer: RenderPipeline) -> Self {
        let store = Arc::new(Mutex::new(store));
        let wake = Arc::new(Notify::new());
        let (stop, stop_rx) = watch::channel(false);
        let save_error = Arc::new(watch::channel::<Option<String>>(None).0);

        let handle = tokio::spawn(run_autosave(
            Arc::clone(&store),
            Arc::clone(&wake),
            Arc::clone(&save_error),
            stop_rx,
        ));

        Self {
            store,
            renderer: Arc::new(renderer),
            wake,
            stop,
            save_error,
            autosave_task: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Run a read-only closure against the store.
    pub async fn with_store<R>(&self, f: impl FnOnce(&NoteStore<S>) -> R) -> R {
        let store = self.store.lock().await;
        f(&store)
    }

    /// Snapshot of all notes in tab order.
    pub async fn notes(&self) -> Vec<Note> {
        self.with_store(|store| store.notes().to_vec()).await
    }

    pub async fn active_note(&self) -> Note {
        self.with_store(|store| store.active_note().clone()).await
    }

    pub async fn stats(&self, id: &NoteId) -> Result<NoteStats> {
        self.with_store(|store| store.stats(id)).await
    }

    pub async fn create(&self) -> NoteId {
        self.mutate(NoteStore::create).await
    }

    pub async fn create_with_text(&self, raw_text: &str) -> NoteId {
        self.mutate(|store| store.create_with_text(raw_text)).await
    }

    pub async fn select(&self, id: &NoteId) -> Result<()> {
        self.mutate(|store| store.select(id)).await
    }

    pub async fn rename(&self, id: &NoteId, title: &str) -> Result<bool> {
        self.mutate(|store| store.rename(id, title)).await
    }

    pub async fn clear_title_override(&self, id: &NoteId) -> Result<()> {
        self.mutate(|store| store.clear_title_override(id)).await
    }

    pub async fn update_text(&self, id: &NoteId, raw_text: &str) -> Result<()> {
        self.mutate(|store| store.update_text(id, raw_text)).await
    }

    pub async fn delete(&self, id: &NoteId) -> Result<NoteId> {
        self.mutate(|store| store.delete(id)).await
    }

    /// Replace every note with an already validated import.
    pub async fn replace_all(&self, imported: ImportedNotes) {
        self.mutate(|store| store.replace_all(imported)).await;
    }

    /// Validate a JSON export and apply it. Nothing changes on failure.
    pub async fn import_json(&self, payload: &str) -> Result<usize> {
        let imported = export::import_json(payload)?;
        let count = imported.len();
        self.replace_all(imported).await;
        Ok(count)
    }

    pub async fn export_json(&self) -> Result<String> {
        self.with_store(export::export_json).await
    }

    /// Render the active note's preview.
    pub async fn render_active(&self) -> RenderOutput {
        let raw_text = self
            .with_store(|store| store.active_note().raw_text.clone())
            .await;
        self.renderer.render_detailed(&raw_text)
    }

    /// Render a note's preview.
    pub async fn render(&self, id: &NoteId) -> Result<String> {
        let raw_text = self
            .with_store(|store| store.get(id).map(|note| note.raw_text.clone()))
            .await
            .ok_or(Error::NotFound(*id))?;
        Ok(self.renderer.render(&raw_text))
    }

    pub async fn load_settings(&self) -> Settings {
        self.with_store(NoteStore::load_settings).await
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<()> {
        let mut store = self.store.lock().await;
        store.save_settings(settings)
    }

    /// Write pending changes now.
    pub async fn flush(&self) -> Result<()> {
        let result = self.store.lock().await.flush();
        publish_save_result(&self.save_error, result.as_ref().err());
        result
    }

    /// Message of the most recent failed write, until a write succeeds.
    #[must_use]
    pub fn last_save_error(&self) -> Option<String> {
        self.save_error.borrow().clone()
    }

    /// Watch save failures; the value is `None` while saves succeed.
    #[must_use]
    pub fn save_errors(&self) -> watch::Receiver<Option<String>> {
        self.save_error.subscribe()
    }

    /// Stop the autosave task and perform the final flush.
    pub async fn shutdown(&self) -> Result<()> {
        let _ = self.stop.send(true);
        if let Some(handle) = self.autosave_task.lock().await.take() {
            if let Err(error) = handle.await {
                tracing::warn!("Autosave task ended abnormally: {}", error);
            }
        }

        tracing::info!("Editor shutting down, flushing notes");
        self.flush().await
    }

    async fn mutate<R>(&self, f: impl FnOnce(&mut NoteStore<S>) -> R) -> R {
        let result = {
            let mut store = self.store.lock().await;
            f(&mut store)
        };
        self.wake.notify_one();
        result
    }
}

async fn run_autosave<S: KeyValueStore>(
    store: Arc<Mutex<NoteStore<S>>>,
    wake: Arc<Notify>,
    save_error: Arc<watch::Sender<Option<String>>>,
    mut stop: watch::Receiver<bool>,
) {
    loop {
        if *stop.borrow() {
            break;
        }

        let deadline = store.lock().await.pending_save_deadline();
        if let Some(deadline) = deadline {
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => {
                    let mut store = store.lock().await;
                    match store.poll_autosave() {
                        Ok(true) => {
                            tracing::debug!("Auto-saved notes");
                            publish_save_result(&save_error, None);
                        }
                        Ok(false) => {}
                        Err(error) => {
                            tracing::error!("Failed to auto-save notes: {}", error);
                            publish_save_result(&save_error, Some(&error));
                        }
                    }
                }
                () = wake.notified() => {}
                _ = stop.changed() => break,
            }
        } else {
            tokio::select! {
                () = wake.notified() => {}
                _ = stop.changed() => break,
            }
        }
    }
    tracing::debug!("Autosave task stopped");
}

fn publish_save_result(save_error: &watch::Sender<Option<String>>, error: Option<&Error>) {
    let message = error.map(ToString::to_string);
    save_error.send_if_modified(|current| {
        if *current == message {
            false
        } else {
            *current = message;
            true
        }
    });
}
