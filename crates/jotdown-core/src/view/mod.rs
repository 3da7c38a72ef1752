//! View-mode state machine and the dual-pane controller.
//!
//! The editor shows one of three layouts: editor only (`Hide`), editor and
//! preview side by side (`Split`), or preview only (`Full`). The split/full
//! choice is remembered while the preview is hidden.

mod scroll;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

pub use scroll::{Pane, PaneMetrics, ScrollCommand, ScrollSync};

use crate::config::EditorConfig;

/// Layout used while the preview is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Editor and preview side by side
    #[default]
    Split,
    /// Preview only
    Full,
}

/// The three observable layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreset {
    /// Editor only
    Hide,
    Split,
    Full,
}

/// Preview visibility plus the sticky view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub preview_enabled: bool,
    pub view_mode: ViewMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            preview_enabled: true,
            view_mode: ViewMode::Split,
        }
    }
}

impl ViewState {
    /// Editor-only state that will reopen in split mode
    #[must_use]
    pub const fn hidden() -> Self {
        Self {
            preview_enabled: false,
            view_mode: ViewMode::Split,
        }
    }

    /// Current layout
    #[must_use]
    pub const fn preset(&self) -> ViewPreset {
        match (self.preview_enabled, self.view_mode) {
            (false, _) => ViewPreset::Hide,
            (true, ViewMode::Split) => ViewPreset::Split,
            (true, ViewMode::Full) => ViewPreset::Full,
        }
    }

    /// Show or hide the preview, keeping the last view mode
    pub fn toggle_preview(&mut self) -> ViewPreset {
        self.preview_enabled = !self.preview_enabled;
        self.preset()
    }

    /// Switch between split and full; ignored while the preview is hidden
    pub fn toggle_view_mode(&mut self) -> ViewPreset {
        if self.preview_enabled {
            self.view_mode = match self.view_mode {
                ViewMode::Split => ViewMode::Full,
                ViewMode::Full => ViewMode::Split,
            };
        }
        self.preset()
    }

    /// Leave full-preview for split; does nothing from any other layout
    pub fn back_to_split(&mut self) -> ViewPreset {
        if self.preset() == ViewPreset::Full {
            self.view_mode = ViewMode::Split;
        }
        self.preset()
    }

    /// Jump straight to a layout, as the toolbar dropdown does
    pub fn select(&mut self, preset: ViewPreset) -> ViewPreset {
        match preset {
            ViewPreset::Hide => self.preview_enabled = false,
            ViewPreset::Split => {
                self.preview_enabled = true;
                self.view_mode = ViewMode::Split;
            }
            ViewPreset::Full => {
                self.preview_enabled = true;
                self.view_mode = ViewMode::Full;
            }
        }
        self.preset()
    }
}

/// View state plus scroll synchronization for the split layout.
#[derive(Debug, Clone)]
pub struct ViewController {
    state: ViewState,
    sync: ScrollSync,
}

impl ViewController {
    #[must_use]
    pub const fn new(state: ViewState, scroll_cooldown: Duration) -> Self {
        Self {
            state,
            sync: ScrollSync::new(scroll_cooldown),
        }
    }

    #[must_use]
    pub const fn from_config(config: &EditorConfig, state: ViewState) -> Self {
        Self::new(state, config.scroll_cooldown())
    }

    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    #[must_use]
    pub const fn preset(&self) -> ViewPreset {
        self.state.preset()
    }

    pub fn toggle_preview(&mut self) -> ViewPreset {
        let preset = self.state.toggle_preview();
        self.after_transition(preset)
    }

    pub fn toggle_view_mode(&mut self) -> ViewPreset {
        let preset = self.state.toggle_view_mode();
        self.after_transition(preset)
    }

    pub fn back_to_split(&mut self) -> ViewPreset {
        let preset = self.state.back_to_split();
        self.after_transition(preset)
    }

    pub fn select(&mut self, preset: ViewPreset) -> ViewPreset {
        let preset = self.state.select(preset);
        self.after_transition(preset)
    }

    /// Handle a scroll event; only the split layout syncs panes
    pub fn on_scroll(
        &mut self,
        source: Pane,
        source_metrics: PaneMetrics,
        target_metrics: PaneMetrics,
        now: Instant,
    ) -> Option<ScrollCommand> {
        if self.state.preset() != ViewPreset::Split {
            return None;
        }
        self.sync
            .on_scroll(source, source_metrics, target_metrics, now)
    }

    fn after_transition(&mut self, preset: ViewPreset) -> ViewPreset {
        if preset != ViewPreset::Split {
            self.sync.reset();
        }
        tracing::debug!("View preset is now {:?}", preset);
        preset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_toggle_preview_then_mode_twice_is_split() {
        let mut state = ViewState::hidden();
        assert_eq!(state.toggle_preview(), ViewPreset::Split);
        assert_eq!(state.toggle_view_mode(), ViewPreset::Full);
        assert_eq!(state.toggle_view_mode(), ViewPreset::Split);
    }

    #[test]
    fn view_mode_is_sticky_across_hide() {
        let mut state = ViewState::default();
        state.toggle_view_mode();
        assert_eq!(state.toggle_preview(), ViewPreset::Hide);
        assert_eq!(state.toggle_preview(), ViewPreset::Full);
    }

    #[test]
    fn toggle_view_mode_is_ignored_while_hidden() {
        let mut state = ViewState::hidden();
        assert_eq!(state.toggle_view_mode(), ViewPreset::Hide);
        assert_eq!(state.view_mode, ViewMode::Split);
    }

    #[test]
    fn back_to_split_only_leaves_full() {
        let mut state = ViewState::default();
        state.select(ViewPreset::Full);
        assert_eq!(state.back_to_split(), ViewPreset::Split);
        assert_eq!(state.back_to_split(), ViewPreset::Split);

        let mut hidden = ViewState::hidden();
        assert_eq!(hidden.back_to_split(), ViewPreset::Hide);
    }

    #[test]
    fn back_to_split_from_full_never_hides() {
        for start in [ViewMode::Split, ViewMode::Full] {
            let mut state = ViewState {
                preview_enabled: true,
                view_mode: start,
            };
            state.select(ViewPreset::Full);
            assert_eq!(state.back_to_split(), ViewPreset::Split);
            assert!(state.preview_enabled);
        }
    }

    #[test]
    fn select_reaches_each_preset() {
        let mut state = ViewState::default();
        assert_eq!(state.select(ViewPreset::Hide), ViewPreset::Hide);
        assert_eq!(state.select(ViewPreset::Full), ViewPreset::Full);
        assert_eq!(state.select(ViewPreset::Split), ViewPreset::Split);
    }

    #[test]
    fn select_hide_keeps_last_mode() {
        let mut state = ViewState::default();
        state.select(ViewPreset::Full);
        state.select(ViewPreset::Hide);
        assert_eq!(state.toggle_preview(), ViewPreset::Full);
    }

    #[test]
    fn view_state_serializes_with_camel_case() {
        let json = serde_json::to_string(&ViewState::default()).unwrap();
        assert_eq!(json, r#"{"previewEnabled":true,"viewMode":"split"}"#);
    }

    fn metrics(offset: f64) -> PaneMetrics {
        PaneMetrics::new(offset, 1000.0, 200.0)
    }

    #[test]
    fn controller_syncs_only_in_split() {
        let now = Instant::now();
        let mut controller = ViewController::new(ViewState::default(), Duration::from_millis(50));
        assert!(controller
            .on_scroll(Pane::Editor, metrics(400.0), metrics(0.0), now)
            .is_some());

        controller.select(ViewPreset::Full);
        assert!(controller
            .on_scroll(Pane::Editor, metrics(400.0), metrics(0.0), now)
            .is_none());

        controller.select(ViewPreset::Hide);
        assert!(controller
            .on_scroll(Pane::Preview, metrics(400.0), metrics(0.0), now)
            .is_none());
    }

    #[test]
    fn leaving_split_clears_echo_guard() {
        let now = Instant::now();
        let mut controller = ViewController::new(ViewState::default(), Duration::from_millis(50));
        controller
            .on_scroll(Pane::Editor, metrics(400.0), metrics(0.0), now)
            .unwrap();

        controller.toggle_view_mode();
        controller.back_to_split();

        // The preview was the driven pane; without the reset this would be ignored.
        assert!(controller
            .on_scroll(Pane::Preview, metrics(100.0), metrics(0.0), now)
            .is_some());
    }
}
