//! Editor configuration.
//!
//! Provides `EditorConfig`, the tunables hosts pass to the note store and the
//! view controller: storage keys plus the autosave and scroll-sync timings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Default key holding `{ notes, activeNoteId }`.
pub const DEFAULT_STATE_KEY: &str = "jotdown.state";
/// Default key holding user settings.
pub const DEFAULT_SETTINGS_KEY: &str = "jotdown.settings";
/// Idle save delay - save after 2 seconds of no typing
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;
/// How long a pane driven by scroll sync ignores its own scroll events.
pub const DEFAULT_SCROLL_COOLDOWN_MS: u64 = 50;

/// Editor tunables.
///
/// Every field has a default, so `{}` is a valid configuration. Unknown
/// fields are rejected to catch typos in hand-written config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub state_key: String,
    pub settings_key: String,
    pub autosave_delay_ms: u64,
    pub scroll_cooldown_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            scroll_cooldown_ms: DEFAULT_SCROLL_COOLDOWN_MS,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a configuration from a raw JSON payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)
            .map_err(|error| Error::Config(format!("invalid editor config JSON: {error}")))?;
        config.validate()
    }

    /// Normalize storage keys and reject unusable values.
    pub fn validate(self) -> Result<Self> {
        let state_key = normalize_required_key(self.state_key, "state_key")?;
        let settings_key = normalize_required_key(self.settings_key, "settings_key")?;
        if state_key == settings_key {
            return Err(Error::Config(
                "state_key and settings_key must be different".to_string(),
            ));
        }

        Ok(Self {
            state_key,
            settings_key,
            ..self
        })
    }

    /// Quiescence delay before an autosave flush.
    #[must_use]
    pub const fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// Echo-suppression window for scroll sync.
    #[must_use]
    pub const fn scroll_cooldown(&self) -> Duration {
        Duration::from_millis(self.scroll_cooldown_ms)
    }
}

fn normalize_required_key(raw: String, field: &str) -> Result<String> {
    normalize_text_option(Some(raw))
        .ok_or_else(|| Error::Config(format!("config field '{field}' must not be empty")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = EditorConfig::from_json("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.autosave_delay(), Duration::from_millis(2000));
        assert_eq!(config.scroll_cooldown(), Duration::from_millis(50));
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config =
            EditorConfig::from_json(r#"{ "autosave_delay_ms": 500, "state_key": " notes " }"#)
                .unwrap();
        assert_eq!(config.autosave_delay_ms, 500);
        assert_eq!(config.state_key, "notes");
        assert_eq!(config.settings_key, DEFAULT_SETTINGS_KEY);
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = EditorConfig::from_json(r#"{ "autosave_delay": 10 }"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn rejects_blank_keys() {
        let error = EditorConfig::from_json(r#"{ "settings_key": "   " }"#).unwrap_err();
        assert!(error.to_string().contains("settings_key"));
    }

    #[test]
    fn rejects_shared_keys() {
        let error =
            EditorConfig::from_json(r#"{ "state_key": "same", "settings_key": "same" }"#)
                .unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }
}
