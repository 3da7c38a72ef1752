//! User settings model

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{KeyValueStore, Persistence};
use crate::view::ViewState;

/// Smallest editor/preview font size in pixels
pub const MIN_FONT_SIZE: u32 = 12;
/// Largest editor/preview font size in pixels
pub const MAX_FONT_SIZE: u32 = 20;
/// Font size used when nothing is saved
pub const DEFAULT_FONT_SIZE: u32 = 14;

/// Theme mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeMode {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// User settings, persisted separately from notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Theme mode
    pub theme: ThemeMode,
    /// Font size in pixels
    pub font_size: u32,
    /// Whether the note list is collapsed
    pub sidebar_collapsed: bool,
    /// Last preview layout
    pub view: ViewState,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            font_size: DEFAULT_FONT_SIZE,
            sidebar_collapsed: false,
            view: ViewState::default(),
        }
    }
}

impl Settings {
    /// Load settings from `key`, falling back to defaults
    ///
    /// Out-of-range font sizes from older or hand-edited state are clamped.
    pub fn load<S: KeyValueStore>(persistence: &Persistence<S>, key: &str) -> Self {
        let mut settings: Self = persistence.load(key).unwrap_or_default();
        settings.set_font_size(settings.font_size);
        settings
    }

    /// Write settings under `key`
    pub fn save<S: KeyValueStore>(&self, persistence: &mut Persistence<S>, key: &str) -> Result<()> {
        persistence.save(key, self)
    }

    /// Switch between light and dark
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Set the font size, clamped to the supported range
    pub fn set_font_size(&mut self, size: u32) -> u32 {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.font_size
    }

    pub fn increase_font_size(&mut self) -> u32 {
        self.set_font_size(self.font_size.saturating_add(1))
    }

    pub fn decrease_font_size(&mut self) -> u32 {
        self.set_font_size(self.font_size.saturating_sub(1))
    }

    #[must_use]
    pub const fn can_increase_font_size(&self) -> bool {
        self.font_size < MAX_FONT_SIZE
    }

    #[must_use]
    pub const fn can_decrease_font_size(&self) -> bool {
        self.font_size > MIN_FONT_SIZE
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SETTINGS_KEY;
    use crate::storage::MemoryStore;
    use crate::view::ViewPreset;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.font_size, 14);
        assert_eq!(settings.theme, ThemeMode::Light);
        assert!(!settings.sidebar_collapsed);
        assert_eq!(settings.view.preset(), ViewPreset::Split);
    }

    #[test]
    fn test_toggle_theme() {
        let mut settings = Settings::default();
        assert_eq!(settings.toggle_theme(), ThemeMode::Dark);
        assert_eq!(settings.toggle_theme(), ThemeMode::Light);
    }

    #[test]
    fn test_font_size_is_clamped() {
        let mut settings = Settings::default();
        assert_eq!(settings.set_font_size(40), MAX_FONT_SIZE);
        assert!(!settings.can_increase_font_size());
        assert_eq!(settings.increase_font_size(), MAX_FONT_SIZE);

        assert_eq!(settings.set_font_size(0), MIN_FONT_SIZE);
        assert!(!settings.can_decrease_font_size());
        assert_eq!(settings.decrease_font_size(), MIN_FONT_SIZE);
        assert_eq!(settings.increase_font_size(), 13);
    }

    #[test]
    fn test_toggle_sidebar() {
        let mut settings = Settings::default();
        assert!(settings.toggle_sidebar());
        assert!(!settings.toggle_sidebar());
    }

    #[test]
    fn test_settings_roundtrip_through_persistence() {
        let mut persistence = Persistence::new(MemoryStore::new());
        let mut settings = Settings::default();
        settings.toggle_theme();
        settings.set_font_size(18);
        settings.view.select(ViewPreset::Full);

        settings.save(&mut persistence, DEFAULT_SETTINGS_KEY).unwrap();
        assert_eq!(Settings::load(&persistence, DEFAULT_SETTINGS_KEY), settings);
    }

    #[test]
    fn test_settings_json_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "theme": "light",
                "fontSize": 14,
                "sidebarCollapsed": false,
                "view": { "previewEnabled": true, "viewMode": "split" }
            })
        );
    }

    #[test]
    fn test_partial_or_out_of_range_settings_are_repaired() {
        let mut persistence = Persistence::new(MemoryStore::new());
        persistence
            .store_mut()
            .set(DEFAULT_SETTINGS_KEY, r#"{"theme":"dark","fontSize":99}"#)
            .unwrap();

        let settings = Settings::load(&persistence, DEFAULT_SETTINGS_KEY);
        assert_eq!(settings.theme, ThemeMode::Dark);
        assert_eq!(settings.font_size, MAX_FONT_SIZE);
        assert!(!settings.sidebar_collapsed);
    }

    #[test]
    fn test_missing_settings_use_defaults() {
        let persistence = Persistence::new(MemoryStore::new());
        assert_eq!(
            Settings::load(&persistence, DEFAULT_SETTINGS_KEY),
            Settings::default()
        );
    }
}
