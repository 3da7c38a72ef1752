//! The note/tab store.
//!
//! [`NoteStore`] owns the ordered list of notes and the active tab. Every
//! successful mutation marks the store dirty and (re)arms the autosave
//! debouncer; hosts call [`NoteStore::poll_autosave`] from their event loop
//! (or use [`crate::services::EditorService`]) and [`NoteStore::flush`] once
//! more before exit.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::config::EditorConfig;
use crate::content::WELCOME_NOTE;
use crate::error::{Error, Result};
use crate::export::ImportedNotes;
use crate::models::{Note, NoteId, Settings};
use crate::schedule::Debouncer;
use crate::storage::{KeyValueStore, Persistence};
use crate::text::{char_count, word_count};

/// Shape of the saved state document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    notes: Vec<Note>,
    #[serde(default)]
    active_note_id: Option<NoteId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    notes: &'a [Note],
    active_note_id: NoteId,
}

/// Word and character counts for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteStats {
    pub words: usize,
    pub chars: usize,
}

impl NoteStats {
    #[must_use]
    pub fn of(raw_text: &str) -> Self {
        Self {
            words: word_count(raw_text),
            chars: char_count(raw_text),
        }
    }
}

/// Check the invariants every note list must hold: at least one note and no
/// duplicate ids.
pub(crate) fn check_notes(notes: &[Note]) -> std::result::Result<(), String> {
    if notes.is_empty() {
        return Err("document contains no notes".to_string());
    }

    let mut seen = HashSet::with_capacity(notes.len());
    for note in notes {
        if !seen.insert(note.id) {
            return Err(format!("duplicate note id {}", note.id));
        }
    }
    Ok(())
}

/// Ordered notes plus the active tab, backed by a key-value store.
///
/// Invariants: there is always at least one note, ids are unique, and the
/// active note is one of the notes.
pub struct NoteStore<S> {
    notes: Vec<Note>,
    active: usize,
    persistence: Persistence<S>,
    state_key: String,
    settings_key: String,
    autosave: Debouncer,
    dirty: bool,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Load the saved state, or start fresh with the welcome note
    ///
    /// A missing, malformed, or inconsistent document is replaced by a single
    /// welcome note. An unknown active id falls back to the first note.
    pub fn open(persistence: Persistence<S>, config: &EditorConfig) -> Self {
        let loaded = persistence
            .load::<PersistedState>(&config.state_key)
            .and_then(|state| match check_notes(&state.notes) {
                Ok(()) => Some(state),
                Err(reason) => {
                    tracing::warn!("Discarding saved notes: {}", reason);
                    None
                }
            });

        let mut store = Self {
            notes: Vec::new(),
            active: 0,
            persistence,
            state_key: config.state_key.clone(),
            settings_key: config.settings_key.clone(),
            autosave: Debouncer::new(config.autosave_delay()),
            dirty: false,
        };

        if let Some(state) = loaded {
            store.active = state
                .active_note_id
                .and_then(|id| state.notes.iter().position(|note| note.id == id))
                .unwrap_or_else(|| {
                    if let Some(id) = state.active_note_id {
                        tracing::warn!("Active note {} not found, selecting first note", id);
                    }
                    0
                });
            store.notes = state.notes;
            tracing::info!("Loaded {} notes from '{}'", store.notes.len(), store.state_key);
        } else {
            tracing::info!("Starting with the welcome note");
            store.notes.push(Note::new(WELCOME_NOTE));
            store.mark_changed();
        }

        store
    }

    /// Append an empty note and make it active
    pub fn create(&mut self) -> NoteId {
        self.create_with_text("")
    }

    /// Append a note with initial text and make it active
    pub fn create_with_text(&mut self, raw_text: impl Into<String>) -> NoteId {
        let note = Note::new(raw_text);
        let id = note.id;
        self.notes.push(note);
        self.active = self.notes.len() - 1;
        self.mark_changed();
        tracing::debug!("Created note {}", id);
        id
    }

    /// Make `id` the active note
    pub fn select(&mut self, id: &NoteId) -> Result<()> {
        let index = self.index_of(id)?;
        if index != self.active {
            self.active = index;
            self.mark_changed();
        }
        Ok(())
    }

    /// Pin a title on a note
    ///
    /// Returns `Ok(false)` and changes nothing when `title` is blank.
    pub fn rename(&mut self, id: &NoteId, title: &str) -> Result<bool> {
        let index = self.index_of(id)?;
        let renamed = self.notes[index].set_title_override(title);
        if renamed {
            self.mark_changed();
        }
        Ok(renamed)
    }

    /// Go back to deriving the title from the note's text
    pub fn clear_title_override(&mut self, id: &NoteId) -> Result<()> {
        let index = self.index_of(id)?;
        self.notes[index].clear_title_override();
        self.mark_changed();
        Ok(())
    }

    /// Replace a note's text
    pub fn update_text(&mut self, id: &NoteId, raw_text: impl Into<String>) -> Result<()> {
        let index = self.index_of(id)?;
        self.notes[index].set_text(raw_text);
        self.mark_changed();
        Ok(())
    }

    /// Delete a note and return the id of the note that is active afterwards
    ///
    /// Deleting the active note activates the one before it, or the new first
    /// note when it was first. The last remaining note cannot be deleted.
    pub fn delete(&mut self, id: &NoteId) -> Result<NoteId> {
        let index = self.index_of(id)?;
        if self.notes.len() == 1 {
            return Err(Error::LastNote);
        }

        self.notes.remove(index);
        if index < self.active {
            self.active -= 1;
        } else if index == self.active {
            self.active = index.saturating_sub(1);
        }
        self.mark_changed();

        let active_id = self.active_id();
        tracing::debug!("Deleted note {}, active note is {}", id, active_id);
        Ok(active_id)
    }

    /// Replace every note with a validated import; the first becomes active
    pub fn replace_all(&mut self, imported: ImportedNotes) {
        self.notes = imported.into_notes();
        self.active = 0;
        self.mark_changed();
        tracing::info!("Imported {} notes", self.notes.len());
    }

    /// All notes in tab order
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn active_id(&self) -> NoteId {
        self.notes[self.active].id
    }

    #[must_use]
    pub fn active_note(&self) -> &Note {
        &self.notes[self.active]
    }

    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == *id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always `false`; a store holds at least one note
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Word and character counts for a note
    pub fn stats(&self, id: &NoteId) -> Result<NoteStats> {
        let index = self.index_of(id)?;
        Ok(NoteStats::of(&self.notes[index].raw_text))
    }

    /// Whether there are changes not yet written
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// When the pending autosave becomes due
    #[must_use]
    pub const fn pending_save_deadline(&self) -> Option<Instant> {
        self.autosave.deadline()
    }

    /// Flush if the autosave delay has elapsed since the last change
    ///
    /// Returns whether a write happened. A failed write is retried after
    /// another full delay.
    pub fn poll_autosave(&mut self) -> Result<bool> {
        let now = Instant::now();
        if !self.autosave.take_due(now) {
            return Ok(false);
        }

        match self.flush() {
            Ok(()) => Ok(true),
            Err(error) => {
                self.autosave.schedule(now);
                Err(error)
            }
        }
    }

    /// Write the current state immediately
    ///
    /// On failure the in-memory state and the dirty flag are kept so a later
    /// flush can retry.
    pub fn flush(&mut self) -> Result<()> {
        self.autosave.cancel();
        if !self.dirty {
            return Ok(());
        }

        let state = PersistedStateRef {
            notes: &self.notes,
            active_note_id: self.active_id(),
        };
        match self.persistence.save(&self.state_key, &state) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!("Saved {} notes to '{}'", self.notes.len(), self.state_key);
                Ok(())
            }
            Err(error) => {
                tracing::error!("Failed to save notes: {}", error);
                Err(error)
            }
        }
    }

    /// Load user settings from the settings key
    #[must_use]
    pub fn load_settings(&self) -> Settings {
        Settings::load(&self.persistence, &self.settings_key)
    }

    /// Write user settings under the settings key
    pub fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        settings.save(&mut self.persistence, &self.settings_key)
    }

    pub const fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    fn index_of(&self, id: &NoteId) -> Result<usize> {
        self.notes
            .iter()
            .position(|note| note.id == *id)
            .ok_or(Error::NotFound(*id))
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        self.autosave.schedule(Instant::now());
    }
}
