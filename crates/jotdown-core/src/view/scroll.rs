//! Proportional scroll synchronization between the editor and preview panes.

use std::time::Duration;

use tokio::time::Instant;

use crate::schedule::Debouncer;

/// One of the two panes in split view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    /// The pane on the other side of the split
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }
}

/// Scroll geometry of a pane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneMetrics {
    pub scroll_offset: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl PaneMetrics {
    #[must_use]
    pub const fn new(scroll_offset: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_offset,
            scroll_height,
            client_height,
        }
    }

    /// Largest reachable offset; zero when the content fits
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        let max = self.scroll_height - self.client_height;
        if max.is_finite() && max > 0.0 {
            max
        } else {
            0.0
        }
    }

    /// How far down the pane is, in `[0, 1]`
    #[must_use]
    pub fn scroll_fraction(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            return 0.0;
        }
        let fraction = self.scroll_offset / max;
        if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Offset that puts this pane at `fraction` of its scroll range
    #[must_use]
    pub fn offset_for_fraction(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        fraction * self.max_scroll()
    }
}

/// Instruction to move a pane to an absolute offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub pane: Pane,
    pub offset: f64,
}

/// Mirrors one pane's scroll position onto the other.
///
/// After a pane is driven, its own scroll events are ignored until the
/// cooldown lapses so the programmatic scroll does not bounce back.
#[derive(Debug, Clone)]
pub struct ScrollSync {
    cooldown: Debouncer,
    driven: Option<Pane>,
}

impl ScrollSync {
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            cooldown: Debouncer::new(cooldown),
            driven: None,
        }
    }

    /// Handle a user scroll on `source` and return where to move the other pane
    pub fn on_scroll(
        &mut self,
        source: Pane,
        source_metrics: PaneMetrics,
        target_metrics: PaneMetrics,
        now: Instant,
    ) -> Option<ScrollCommand> {
        if self.is_suppressed(source, now) {
            tracing::trace!("Ignoring echoed scroll on {:?}", source);
            return None;
        }

        let target = source.other();
        let command = ScrollCommand {
            pane: target,
            offset: target_metrics.offset_for_fraction(source_metrics.scroll_fraction()),
        };

        self.driven = Some(target);
        self.cooldown.schedule(now);
        Some(command)
    }

    /// Whether scroll events from `pane` are currently ignored
    #[must_use]
    pub fn is_suppressed(&self, pane: Pane, now: Instant) -> bool {
        self.driven == Some(pane) && self.cooldown.is_active(now)
    }

    /// Forget any pending echo guard
    pub fn reset(&mut self) {
        self.cooldown.cancel();
        self.driven = None;
    }
}
