//! Unlock Sequencer: Gesture Tracker, Transition Controller and
//! Shared-Element Bridge wired together.
//!
//! Data flows one way:
//!
//! ```text
//! input ──> GestureTracker ──Unlocked──> TransitionController ──PhaseEntered──> SharedElementBridge
//! ```
//!
//! The sequencer owns no state of its own beyond its lifecycle; it routes
//! input and completions to the owning machine and forwards edge actions
//! down the chain, so each field keeps a single writer.

use std::time::Instant;

use tracing::{debug, warn};

use crate::{
    action::{Action, AnimationChannel, AnimationId, View},
    bridge::SharedElementBridge,
    config::SequencerConfig,
    error::{ConfigError, SequencerError},
    expansion::{ExpansionPhase, TransitionController},
    gesture::{GestureTracker, LockState},
};

/// Input delivered to the sequencer by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Wheel moved by `delta_y`.
    Wheel {
        /// Vertical delta, positive downwards.
        delta_y: f64,
    },
    /// Pointer pressed on the handle.
    DragStart,
    /// Pointer moved while pressed.
    DragMove {
        /// Handle position along the track.
        x: f64,
    },
    /// Pointer released.
    DragEnd {
        /// Horizontal travel since the press.
        offset: f64,
    },
    /// The surface finished an animation.
    AnimationComplete(AnimationId),
}

/// Read-only view of the sequencer for page composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerSnapshot {
    /// Lock state of the gesture tracker.
    pub lock: LockState,
    /// Handle offset.
    pub progress: f64,
    /// Full handle travel.
    pub max_distance: f64,
    /// Expansion phase.
    pub phase: ExpansionPhase,
    /// Whether the destination content may scroll.
    pub content_scrollable: bool,
    /// Whether the site-ready signal is raised.
    pub site_ready: bool,
}

impl SequencerSnapshot {
    /// Whether the unlock edge has fired.
    pub fn unlocked(&self) -> bool {
        matches!(self.lock, LockState::Unlocked(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Unmounted,
    Mounted,
    TornDown,
}

/// The Unlock Sequencer.
#[derive(Debug, Clone)]
pub struct UnlockSequencer {
    gesture: GestureTracker,
    controller: TransitionController,
    bridge: SharedElementBridge,
    lifecycle: Lifecycle,
}

impl UnlockSequencer {
    /// Validate `config` and build an unmounted sequencer.
    pub fn new(config: SequencerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bridge = SharedElementBridge::new(config.expansion.shared_element);
        Ok(Self {
            gesture: GestureTracker::new(config.gesture),
            controller: TransitionController::new(config.expansion),
            bridge,
            lifecycle: Lifecycle::Unmounted,
        })
    }

    /// Mount the lock screen with a slide track `track_width` wide.
    ///
    /// # Errors
    ///
    /// `AlreadyMounted` or `TornDown` on lifecycle misuse.
    pub fn mount(&mut self, track_width: f64, now: Instant) -> Result<Vec<Action>, SequencerError> {
        match self.lifecycle {
            Lifecycle::Unmounted => {},
            Lifecycle::Mounted => return Err(SequencerError::AlreadyMounted),
            Lifecycle::TornDown => return Err(SequencerError::TornDown),
        }
        let mut actions = self.gesture.mount(track_width, now)?;
        actions.extend(self.bridge.mount_view(View::LockScreen));
        actions.push(Action::ContentScrollable(false));
        self.lifecycle = Lifecycle::Mounted;
        Ok(actions)
    }

    /// Tear down: cancel every deadline and ignore all later input.
    pub fn unmount(&mut self) -> Vec<Action> {
        if self.lifecycle != Lifecycle::Mounted {
            self.lifecycle = Lifecycle::TornDown;
            return Vec::new();
        }
        debug!("unlock sequencer torn down");
        self.lifecycle = Lifecycle::TornDown;
        self.gesture.unmount();
        self.bridge.teardown();
        self.controller.teardown()
    }

    /// Whether the sequencer is mounted and live.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    /// Route one input event.
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Vec<Action> {
        if !self.is_mounted() {
            return Vec::new();
        }
        let actions = match event {
            InputEvent::Wheel { delta_y } => self.gesture.on_wheel(delta_y, now),
            InputEvent::DragStart => self.gesture.on_drag_start(now),
            InputEvent::DragMove { x } => self.gesture.on_drag_move(x, now),
            InputEvent::DragEnd { offset } => self.gesture.on_drag_end(offset, now),
            InputEvent::AnimationComplete(id) => self.on_animation_complete(id, now),
        };
        self.cascade(actions, now)
    }

    /// Fire every due deadline.
    pub fn tick(&mut self, now: Instant) -> Vec<Action> {
        if !self.is_mounted() {
            return Vec::new();
        }
        let mut actions = self.gesture.tick(now);
        actions.extend(self.controller.tick(now));
        self.cascade(actions, now)
    }

    /// Earliest time [`Self::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        if !self.is_mounted() {
            return None;
        }
        match (self.gesture.next_deadline(), self.controller.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Current state for page composition.
    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            lock: self.gesture.lock_state(),
            progress: self.gesture.progress(),
            max_distance: self.gesture.max_distance(),
            phase: self.controller.phase(),
            content_scrollable: self.controller.content_scrollable(),
            site_ready: self.controller.site_ready(),
        }
    }

    /// Shared-element state, for surfaces that render identities.
    pub fn bridge(&self) -> &SharedElementBridge {
        &self.bridge
    }

    fn on_animation_complete(&mut self, id: AnimationId, now: Instant) -> Vec<Action> {
        match id.channel {
            AnimationChannel::Handle => self.gesture.on_animation_complete(id, now),
            AnimationChannel::Frame => self.controller.on_animation_complete(id, now),
            AnimationChannel::LockScreen => {
                let before = self.controller.lock_screen_faded();
                let mut actions = self.controller.on_animation_complete(id, now);
                if !before && self.controller.lock_screen_faded() {
                    actions.extend(self.bridge.on_source_faded());
                }
                actions
            },
        }
    }

    /// Forward edge actions to the next machine in the chain.
    ///
    /// Follow-up actions are appended, so the result stays in causal order.
    fn cascade(&mut self, mut actions: Vec<Action>, now: Instant) -> Vec<Action> {
        let mut i = 0;
        while i < actions.len() {
            let follow = match &actions[i] {
                Action::Unlocked { .. } => self.controller.on_unlock(now).unwrap_or_else(|e| {
                    warn!(error = %e, "unlock edge rejected by transition controller");
                    Vec::new()
                }),
                Action::PhaseEntered(phase) => self.bridge.on_phase(*phase),
                _ => Vec::new(),
            };
            actions.extend(follow);
            i += 1;
        }
        actions
    }
}
