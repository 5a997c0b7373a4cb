//! Gesture Tracker: three input channels, one slide progress, one commit.
//!
//! # State Machine
//!
//! ```text
//! ┌────────┐  idle deadline / wheel debounce / drag release  ┌────────────┐
//! │ Locked │────────────────────────────────────────────────>│ Committing │
//! └────────┘                                                 └────────────┘
//!     │ rejected drag: spring back to 0                            │
//!     └──> Locked                             handle animation done │
//!                                                                   ↓
//!                                                             ┌──────────┐
//!                                                             │ Unlocked │
//!                                                             └──────────┘
//! ```
//!
//! The first channel to commit moves the tracker out of `Locked`, and that
//! move clears both deadlines and stops accepting wheel or drag progress.
//! Nothing ever moves it back. [`Action::Unlocked`] is emitted exactly once,
//! when the handle animation reports completion.
//!
//! # Channels
//!
//! - **Idle**: deadline armed on mount, disarmed when the handle is pressed.
//!   Wheel input leaves it armed, so a partial wheel gesture is carried to
//!   the end of the track when it fires.
//! - **Wheel**: `delta * scroll_damping` accumulates into the progress,
//!   clamped to the track. Crossing the commit ratio arms a short debounce
//!   deadline; the commit happens when it elapses.
//! - **Drag**: the handle follows the pointer; on release the offset either
//!   commits or the handle springs back to 0. A release without a press is
//!   ignored.
//!
//! # Unusable track
//!
//! If the measured track has no positive length, any forward motion commits,
//! so the page can never get stuck behind the lock screen.

use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::{
    action::{Action, AnimationChannel, AnimationId, IdAllocator, Trigger},
    config::GestureConfig,
    error::SequencerError,
};

/// Handle travel (in track units) over which the slide label fades out.
pub const LABEL_FADE_DISTANCE: f64 = 100.0;

/// Unlock progress of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Accepting input on every channel.
    Locked,
    /// A channel won; the handle is travelling to the end of the track.
    Committing(Trigger),
    /// The unlock edge has been emitted.
    Unlocked(Trigger),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Track {
    Measured { max_distance: f64 },
    Unusable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted,
    TornDown,
}

/// Opacity of the slide label for a handle at `x`.
pub fn label_opacity(x: f64) -> f64 {
    (1.0 - x / LABEL_FADE_DISTANCE).clamp(0.0, 1.0)
}

/// Gesture Tracker.
///
/// Sole writer of the slide progress and the lock state.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: GestureConfig,
    lifecycle: Lifecycle,
    track: Track,
    progress: f64,
    lock: LockState,
    dragging: bool,
    idle_deadline: Option<Instant>,
    scroll_commit_deadline: Option<Instant>,
    /// Handle animation whose completion is the unlock edge.
    awaiting: Option<AnimationId>,
    ids: IdAllocator,
}

impl GestureTracker {
    /// Create an unmounted tracker.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::Unmounted,
            track: Track::Unusable,
            progress: 0.0,
            lock: LockState::Locked,
            dragging: false,
            idle_deadline: None,
            scroll_commit_deadline: None,
            awaiting: None,
            ids: IdAllocator::default(),
        }
    }

    /// Measure the track and arm the idle timer.
    ///
    /// # Errors
    ///
    /// `AlreadyMounted` on a second call, `TornDown` after [`Self::unmount`].
    pub fn mount(&mut self, track_width: f64, now: Instant) -> Result<Vec<Action>, SequencerError> {
        match self.lifecycle {
            Lifecycle::Unmounted => {},
            Lifecycle::Mounted => return Err(SequencerError::AlreadyMounted),
            Lifecycle::TornDown => return Err(SequencerError::TornDown),
        }

        let max_distance = track_width - self.config.handle_width - self.config.track_padding;
        self.track = if max_distance.is_finite() && max_distance > 0.0 {
            Track::Measured { max_distance }
        } else {
            warn!(track_width, "slide track has no usable length; any forward motion unlocks");
            Track::Unusable
        };

        let deadline = now + self.config.idle_delay;
        debug!(track = ?self.track, idle_delay = ?self.config.idle_delay, "gesture tracker mounted");
        self.lifecycle = Lifecycle::Mounted;
        self.idle_deadline = Some(deadline);

        Ok(vec![Action::SetHandle { x: 0.0 }, Action::SetLabelOpacity(1.0)])
    }

    /// Stop all timers and ignore everything afterwards.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Mounted {
            debug!("gesture tracker torn down");
        }
        self.lifecycle = Lifecycle::TornDown;
        self.idle_deadline = None;
        self.scroll_commit_deadline = None;
        self.awaiting = None;
        self.dragging = false;
    }

    /// Current handle offset.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Full travel of the handle; 0 when the track was unusable.
    pub fn max_distance(&self) -> f64 {
        match self.track {
            Track::Measured { max_distance } => max_distance,
            Track::Unusable => 0.0,
        }
    }

    /// Current lock state.
    pub fn lock_state(&self) -> LockState {
        self.lock
    }

    /// Whether the unlock edge has been emitted.
    pub fn is_unlocked(&self) -> bool {
        matches!(self.lock, LockState::Unlocked(_))
    }

    /// Whether the handle is currently held.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.accepting_input() {
            return None;
        }
        match (self.idle_deadline, self.scroll_commit_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn accepting_input(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted && self.lock == LockState::Locked
    }

    fn crosses_threshold(&self, candidate: f64) -> bool {
        match self.track {
            Track::Measured { max_distance } => candidate > max_distance * self.config.commit_ratio,
            Track::Unusable => candidate > 0.0,
        }
    }

    fn disarm_idle(&mut self) {
        if self.idle_deadline.take().is_some() {
            debug!("idle unlock disarmed by drag");
        }
    }

    fn place_handle(&mut self, x: f64, actions: &mut Vec<Action>) {
        self.progress = x.clamp(0.0, self.max_distance());
        actions.push(Action::SetHandle { x: self.progress });
        actions.push(Action::SetLabelOpacity(label_opacity(self.progress)));
    }

    /// Handle a wheel event.
    ///
    /// While the page is still locked the default scroll is always
    /// suppressed, including while a commit is in flight.
    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) -> Vec<Action> {
        if self.lifecycle != Lifecycle::Mounted {
            return Vec::new();
        }
        match self.lock {
            LockState::Locked => {},
            LockState::Committing(_) => return vec![Action::PreventDefaultScroll],
            LockState::Unlocked(_) => return Vec::new(),
        }

        let mut actions = vec![Action::PreventDefaultScroll];
        if delta_y == 0.0 || !delta_y.is_finite() {
            return actions;
        }

        let candidate = self.progress + delta_y * self.config.scroll_damping;
        self.place_handle(candidate, &mut actions);

        if self.scroll_commit_deadline.is_none() && self.crosses_threshold(candidate) {
            let deadline = now + self.config.scroll_commit_delay;
            debug!(progress = self.progress, "wheel crossed unlock threshold");
            self.scroll_commit_deadline = Some(deadline);
        }
        actions
    }

    /// Pointer pressed on the handle.
    pub fn on_drag_start(&mut self, _now: Instant) -> Vec<Action> {
        if !self.accepting_input() {
            return Vec::new();
        }
        self.disarm_idle();
        self.dragging = true;
        vec![Action::HandlePressed(true)]
    }

    /// Pointer moved while holding the handle.
    pub fn on_drag_move(&mut self, x: f64, _now: Instant) -> Vec<Action> {
        if !self.accepting_input() || !self.dragging || !x.is_finite() {
            return Vec::new();
        }
        let mut actions = Vec::with_capacity(2);
        self.place_handle(x, &mut actions);
        actions
    }

    /// Pointer released after travelling `offset` from where it was pressed.
    pub fn on_drag_end(&mut self, offset: f64, now: Instant) -> Vec<Action> {
        if !self.accepting_input() || !self.dragging {
            return Vec::new();
        }

        self.dragging = false;
        let mut actions = vec![Action::HandlePressed(false)];

        if offset.is_finite() && self.crosses_threshold(offset) {
            self.commit(Trigger::Drag, now, &mut actions);
        } else {
            // Partial progress is discarded, including a pending wheel commit.
            self.progress = 0.0;
            self.scroll_commit_deadline = None;
            let id = self.ids.next(AnimationChannel::Handle);
            actions.push(Action::AnimateHandle {
                id,
                to: 0.0,
                motion: self.config.spring_back_motion,
            });
            actions.push(Action::SetLabelOpacity(1.0));
        }
        actions
    }

    /// Fire due deadlines.
    pub fn tick(&mut self, now: Instant) -> Vec<Action> {
        if !self.accepting_input() {
            return Vec::new();
        }

        let due = |deadline: Option<Instant>| deadline.is_some_and(|d| now >= d);
        let mut actions = Vec::new();
        if due(self.scroll_commit_deadline) {
            self.commit(Trigger::Scroll, now, &mut actions);
        } else if due(self.idle_deadline) {
            self.commit(Trigger::Idle, now, &mut actions);
        }
        actions
    }

    /// Surface reported that a handle animation finished.
    pub fn on_animation_complete(&mut self, id: AnimationId, _now: Instant) -> Vec<Action> {
        if self.lifecycle != Lifecycle::Mounted || self.awaiting != Some(id) {
            trace!(?id, "ignoring handle animation completion");
            return Vec::new();
        }
        let LockState::Committing(trigger) = self.lock else {
            return Vec::new();
        };

        self.awaiting = None;
        self.lock = LockState::Unlocked(trigger);
        info!(?trigger, "unlocked");
        vec![Action::Unlocked { trigger }]
    }

    fn commit(&mut self, trigger: Trigger, _now: Instant, actions: &mut Vec<Action>) {
        if self.lock != LockState::Locked {
            debug!(?trigger, "unlock already committed; ignoring");
            return;
        }

        self.lock = LockState::Committing(trigger);
        self.idle_deadline = None;
        self.scroll_commit_deadline = None;
        if std::mem::take(&mut self.dragging) {
            actions.push(Action::HandlePressed(false));
        }
        self.progress = self.max_distance();

        let id = self.ids.next(AnimationChannel::Handle);
        self.awaiting = Some(id);
        let motion = match trigger {
            Trigger::Idle => self.config.idle_commit_motion,
            Trigger::Scroll | Trigger::Drag => self.config.manual_commit_motion,
        };
        info!(?trigger, "unlock committed");
        actions.push(Action::AnimateHandle { id, to: self.progress, motion });
        actions.push(Action::SetLabelOpacity(label_opacity(self.progress)));
    }
}
