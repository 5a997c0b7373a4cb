//! Simulated driver.
//!
//! Implements [`Driver`] over a [`SimClock`] and a reference [`Surface`].
//! `poll_event` jumps the clock straight to the next interesting instant
//! (scripted input, animation completion, sequencer deadline or the end of
//! the run), so a run never sleeps.

use std::{
    collections::VecDeque,
    future::{self, Future},
    time::{Duration, Instant},
};

use slidelock_app::{App, AppEvent, Driver, Surface, Theme};
use slidelock_core::{Action, InputEvent};
use thiserror::Error;
use tracing::trace;

use crate::{
    clock::SimClock,
    script::{Script, Step},
};

/// Simulation failures.
#[derive(Debug, Error)]
pub enum SimError {
    /// Polled after [`Driver::stop`].
    #[error("simulated driver polled after stop")]
    Stopped,
}

/// One applied surface action.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    /// Virtual time since start.
    pub at: Duration,
    /// The action.
    pub action: Action,
}

/// Scripted, virtual-time driver.
#[derive(Debug)]
pub struct SimDriver {
    clock: SimClock,
    surface: Surface,
    track_width: f64,
    script: VecDeque<Step>,
    horizon: Duration,
    queued: Vec<AppEvent>,
    trace: Vec<TraceEntry>,
    persisted: Vec<Theme>,
    renders: usize,
    stopped: bool,
}

impl SimDriver {
    /// Driver for `script` that ends the run at `horizon`.
    pub fn new(script: Script, horizon: Duration) -> Self {
        Self {
            clock: SimClock::new(),
            surface: Surface::new(1280.0, 800.0),
            track_width: 270.0,
            script: script.into_steps().into(),
            horizon,
            queued: Vec::new(),
            trace: Vec::new(),
            persisted: Vec::new(),
            renders: 0,
            stopped: false,
        }
    }

    /// Override the measured slide-track width.
    #[must_use]
    pub fn with_track_width(mut self, width: f64) -> Self {
        self.track_width = width;
        self
    }

    /// Override the viewport.
    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.surface.resize(width, height);
        self
    }

    /// Virtual clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Reference surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Every applied action, in order.
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Theme choices persisted.
    pub fn persisted(&self) -> &[Theme] {
        &self.persisted
    }

    /// Number of renders.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Whether [`Driver::stop`] ran.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn next_wake(&self, deadline: Option<Instant>) -> Instant {
        let script = self.script.front().map(|s| self.clock.at(s.at));
        [deadline, script, self.surface.next_completion()]
            .into_iter()
            .flatten()
            .fold(self.clock.at(self.horizon), Instant::min)
    }

    fn poll_now(&mut self, deadline: Option<Instant>) -> Result<Vec<AppEvent>, SimError> {
        if self.stopped {
            return Err(SimError::Stopped);
        }
        if !self.queued.is_empty() {
            return Ok(std::mem::take(&mut self.queued));
        }

        let wake = self.next_wake(deadline);
        self.clock.advance_to(wake);
        let now = self.clock.now();

        let mut events: Vec<AppEvent> = self
            .surface
            .take_completions(now)
            .into_iter()
            .map(|id| AppEvent::Input(InputEvent::AnimationComplete(id)))
            .collect();
        while self.script.front().is_some_and(|s| self.clock.at(s.at) <= now) {
            if let Some(step) = self.script.pop_front() {
                events.push(step.event);
            }
        }

        if events.is_empty() && self.clock.elapsed() >= self.horizon {
            trace!(elapsed = ?self.clock.elapsed(), "simulation horizon reached");
            events.push(AppEvent::Quit);
        }
        Ok(events)
    }

    fn queue_scroll(&mut self, top: Option<f64>) {
        if let Some(scroll_top) = top {
            let (_, viewport_height) = self.surface.viewport();
            self.queued.push(AppEvent::ContentScrolled { scroll_top, viewport_height });
        }
    }

    fn max_scroll(&self, app: &App) -> f64 {
        app.sections().content_height() - self.surface.viewport().1
    }
}

impl Driver for SimDriver {
    type Error = SimError;

    fn poll_event(
        &mut self,
        deadline: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send {
        future::ready(self.poll_now(deadline))
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }

    fn track_width(&self) -> f64 {
        self.track_width
    }

    fn apply(&mut self, actions: &[Action], now: Instant) {
        let at = self.clock.offset_of(now);
        for action in actions {
            self.surface.apply(action, now);
            self.trace.push(TraceEntry { at, action: action.clone() });
        }
    }

    fn scroll_to(&mut self, offset: f64, app: &App) {
        let max = self.max_scroll(app);
        let top = self.surface.scroll_to(offset, max);
        self.queue_scroll(top);
    }

    fn scroll_by(&mut self, delta: f64, app: &App) {
        let max = self.max_scroll(app);
        let top = self.surface.scroll_to(self.surface.scroll_top() + delta, max);
        self.queue_scroll(top);
    }

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        Ok(())
    }

    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error> {
        self.persisted.push(theme);
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
