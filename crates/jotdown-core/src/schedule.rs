//! Deadline tracking for debounced and cooled-down actions.
//!
//! The core never spawns timers itself. A [`Debouncer`] only remembers when
//! the pending action becomes due; hosts poll it (or sleep until
//! [`Debouncer::deadline`]). Scheduling again replaces the pending deadline,
//! which is how a newer event cancels an earlier one.

use std::time::Duration;

use tokio::time::Instant;

/// A single cancellable deadline with a fixed delay.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer that fires `delay` after the last schedule.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the deadline relative to `now`.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        let deadline = now + self.delay;
        self.deadline = Some(deadline);
        deadline
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// When the pending action becomes due, if one is pending.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the pending action is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Whether a deadline is pending and still in the future at `now`.
    #[must_use]
    pub fn is_active(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now < deadline)
    }

    /// Consume the pending action if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}
