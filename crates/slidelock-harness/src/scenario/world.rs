//! World state after scenario execution.
//!
//! Everything the run produced: the applied action trace, the final
//! surface and page view, persisted theme choices and published signals.

use std::time::Duration;

use slidelock_app::{PageView, Signal, Surface, Theme};
use slidelock_core::{Action, ExpansionPhase, SequencerSnapshot, Trigger};

use crate::sim_driver::TraceEntry;

/// Final state of a scenario run.
#[derive(Debug)]
pub struct World {
    pub(crate) name: String,
    pub(crate) trace: Vec<TraceEntry>,
    pub(crate) surface: Surface,
    pub(crate) view: PageView,
    pub(crate) snapshot: SequencerSnapshot,
    pub(crate) deadline_pending: bool,
    pub(crate) persisted: Vec<Theme>,
    pub(crate) signals: Vec<Signal>,
    pub(crate) renders: usize,
    pub(crate) stopped: bool,
    pub(crate) elapsed: Duration,
}

impl World {
    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every surface action, in the order it was applied.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Final surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Page view at the end of the run (after teardown).
    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// Sequencer state at the end of the run (after teardown).
    pub fn snapshot(&self) -> &SequencerSnapshot {
        &self.snapshot
    }

    /// Whether the sequencer still had an armed deadline after teardown.
    pub fn deadline_pending(&self) -> bool {
        self.deadline_pending
    }

    /// Theme choices persisted during the run.
    pub fn persisted(&self) -> &[Theme] {
        &self.persisted
    }

    /// Signals published during the run.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Number of renders.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Whether the driver was stopped.
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Virtual time the run took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Actions matching `pred`, with their times.
    pub fn find<'a>(
        &'a self,
        pred: impl Fn(&Action) -> bool + 'a,
    ) -> impl Iterator<Item = &'a TraceEntry> + 'a {
        self.trace.iter().filter(move |e| pred(&e.action))
    }

    /// Time of the first action matching `pred`.
    pub fn first_at(&self, pred: impl Fn(&Action) -> bool) -> Option<Duration> {
        self.trace.iter().find(|e| pred(&e.action)).map(|e| e.at)
    }

    /// Index of the first action equal to `action`.
    pub fn position(&self, action: &Action) -> Option<usize> {
        self.trace.iter().position(|e| e.action == *action)
    }

    /// Phases entered, in order.
    pub fn phases(&self) -> Vec<ExpansionPhase> {
        self.trace
            .iter()
            .filter_map(|e| match e.action {
                Action::PhaseEntered(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Triggers of every unlock edge.
    pub fn unlocks(&self) -> Vec<Trigger> {
        self.trace
            .iter()
            .filter_map(|e| match e.action {
                Action::Unlocked { trigger } => Some(trigger),
                _ => None,
            })
            .collect()
    }
}
