//! Virtual time.

use std::time::{Duration, Instant};

/// Clock that only moves when told to.
///
/// Anchored to a real [`Instant`] so the values can be handed to code that
/// expects `std::time`, but never reads the system clock again.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    origin: Instant,
    elapsed: Duration,
}

impl SimClock {
    /// Clock at elapsed zero.
    pub fn new() -> Self {
        Self { origin: Instant::now(), elapsed: Duration::ZERO }
    }

    /// Current virtual instant.
    pub fn now(&self) -> Instant {
        self.origin + self.elapsed
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Instant `offset` after the origin.
    pub fn at(&self, offset: Duration) -> Instant {
        self.origin + offset
    }

    /// Offset of `instant` from the origin (zero if earlier).
    pub fn offset_of(&self, instant: Instant) -> Duration {
        instant.saturating_duration_since(self.origin)
    }

    /// Move forward by `by`.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Move forward to `instant`. Never moves backwards.
    pub fn advance_to(&mut self, instant: Instant) {
        self.elapsed = self.elapsed.max(self.offset_of(instant));
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}
