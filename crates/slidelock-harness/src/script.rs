//! Scripted input.
//!
//! A [`Script`] is a list of events at fixed offsets from the start of the
//! run. Helpers expand common gestures (a drag across the track, a burst of
//! trackpad wheel events) into their individual events; wheel noise comes
//! from a seeded ChaCha RNG so a failing run can be replayed exactly.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slidelock_app::AppEvent;
use slidelock_core::InputEvent;

/// One scripted event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Offset from the start of the run.
    pub at: Duration,
    /// Event delivered at that offset.
    pub event: AppEvent,
}

/// Ordered input script.
#[derive(Debug, Clone, Default)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` at `ms` milliseconds.
    #[must_use]
    pub fn at(mut self, ms: u64, event: impl Into<AppEvent>) -> Self {
        self.steps.push(Step { at: Duration::from_millis(ms), event: event.into() });
        self
    }

    /// One wheel event.
    #[must_use]
    pub fn wheel(self, ms: u64, delta_y: f64) -> Self {
        self.at(ms, InputEvent::Wheel { delta_y })
    }

    /// Press at `start_ms`, move to `to_x` in `moves` even steps over
    /// `duration_ms`, release there.
    #[must_use]
    pub fn drag(mut self, start_ms: u64, to_x: f64, duration_ms: u64, moves: u32) -> Self {
        self = self.at(start_ms, InputEvent::DragStart);
        let moves = moves.max(1);
        for i in 1..=moves {
            let frac = f64::from(i) / f64::from(moves);
            let at = start_ms + duration_ms * u64::from(i) / u64::from(moves);
            self = self.at(at, InputEvent::DragMove { x: to_x * frac });
        }
        self.at(start_ms + duration_ms, InputEvent::DragEnd { offset: to_x })
    }

    /// `count` wheel events every `interval_ms`, each `mean_delta` with up
    /// to 50% seeded jitter.
    #[must_use]
    pub fn wheel_burst(
        mut self,
        seed: u64,
        start_ms: u64,
        count: u32,
        interval_ms: u64,
        mean_delta: f64,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for i in 0..u64::from(count) {
            let jitter: f64 = rng.gen_range(-0.5..=0.5);
            self = self.wheel(start_ms + i * interval_ms, mean_delta * (1.0 + jitter));
        }
        self
    }

    /// Quit at `ms`.
    #[must_use]
    pub fn quit(self, ms: u64) -> Self {
        self.at(ms, AppEvent::Quit)
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps in delivery order; ties keep insertion order.
    pub fn into_steps(mut self) -> Vec<Step> {
        self.steps.sort_by_key(|s| s.at);
        self.steps
    }
}
