//! Transition Controller: phone frame to full viewport.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐ unlock ┌─────────────────┐ border deadline ┌───────────────┐
//! │ Initial │───────>│ BorderExpanding │────────────────>│ FullyExpanded │
//! └─────────┘        └─────────────────┘                 └───────────────┘
//!                                                                │
//!                                       bounds animation complete │
//!                                                                ↓
//!                                                      ┌─────────────────┐
//!                                                      │ ContentSettled  │
//!                                                      └─────────────────┘
//! ```
//!
//! After `unlock` every transition is driven by time: the border pulse is a
//! plain deadline, the settle waits for the bounds animation's completion
//! token. `ContentSettled` is terminal. Content becomes scrollable on entry,
//! and the site-ready signal follows after a short grace deadline.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    action::{Action, AnimationChannel, AnimationId, IdAllocator},
    config::ExpansionConfig,
    error::SequencerError,
};

/// Ordered, one-directional expansion phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpansionPhase {
    /// Phone-sized frame, waiting for unlock.
    Initial,
    /// Cosmetic border pulse.
    BorderExpanding,
    /// Frame animating to the viewport; old content fading out.
    FullyExpanded,
    /// Expansion done; content scrollable.
    ContentSettled,
}

impl ExpansionPhase {
    /// Phase that follows this one.
    pub fn next(self) -> Option<Self> {
        match self {
            ExpansionPhase::Initial => Some(ExpansionPhase::BorderExpanding),
            ExpansionPhase::BorderExpanding => Some(ExpansionPhase::FullyExpanded),
            ExpansionPhase::FullyExpanded => Some(ExpansionPhase::ContentSettled),
            ExpansionPhase::ContentSettled => None,
        }
    }
}

/// Frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Extent {
    /// Fixed size in layout units.
    Fixed {
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
    /// Fill the viewport.
    Viewport,
}

/// Visual style of the phone frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameStyle {
    /// Bounds.
    pub extent: Extent,
    /// Corner radius.
    pub border_radius: f64,
    /// Border thickness.
    pub border_width: f64,
    /// Border alpha (black border).
    pub border_alpha: f64,
    /// Uniform scale.
    pub scale: f64,
}

impl FrameStyle {
    /// Resting phone frame.
    pub const PHONE: Self = Self {
        extent: Extent::Fixed { width: 375.0, height: 812.0 },
        border_radius: 60.0,
        border_width: 5.0,
        border_alpha: 1.0,
        scale: 1.0,
    };

    /// Border pulse; same bounds as [`Self::PHONE`].
    pub const PULSE: Self = Self {
        extent: Extent::Fixed { width: 375.0, height: 812.0 },
        border_radius: 60.0,
        border_width: 15.0,
        border_alpha: 0.8,
        scale: 1.02,
    };

    /// Borderless full viewport.
    pub const FULLSCREEN: Self = Self {
        extent: Extent::Viewport,
        border_radius: 0.0,
        border_width: 0.0,
        border_alpha: 0.0,
        scale: 1.0,
    };
}

/// Transition Controller.
///
/// Sole writer of the expansion phase, the content scroll lock and the
/// site-ready flag.
#[derive(Debug, Clone)]
pub struct TransitionController {
    config: ExpansionConfig,
    phase: ExpansionPhase,
    torn_down: bool,
    border_deadline: Option<Instant>,
    site_ready_deadline: Option<Instant>,
    bounds: Option<AnimationId>,
    fade: Option<AnimationId>,
    lock_screen_faded: bool,
    content_scrollable: bool,
    site_ready: bool,
    ids: IdAllocator,
}

impl TransitionController {
    /// Create a controller in [`ExpansionPhase::Initial`].
    pub fn new(config: ExpansionConfig) -> Self {
        Self {
            config,
            phase: ExpansionPhase::Initial,
            torn_down: false,
            border_deadline: None,
            site_ready_deadline: None,
            bounds: None,
            fade: None,
            lock_screen_faded: false,
            content_scrollable: false,
            site_ready: false,
            ids: IdAllocator::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ExpansionPhase {
        self.phase
    }

    /// Whether the destination content may scroll.
    pub fn content_scrollable(&self) -> bool {
        self.content_scrollable
    }

    /// Whether the site-ready signal is raised.
    pub fn site_ready(&self) -> bool {
        self.site_ready
    }

    /// Whether the lock-screen fade has finished.
    pub fn lock_screen_faded(&self) -> bool {
        self.lock_screen_faded
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.torn_down {
            return None;
        }
        self.border_deadline.or(self.site_ready_deadline)
    }

    /// Start the expansion.
    ///
    /// # Errors
    ///
    /// `InvalidPhase` if the expansion has already started.
    pub fn on_unlock(&mut self, now: Instant) -> Result<Vec<Action>, SequencerError> {
        if self.torn_down {
            return Err(SequencerError::TornDown);
        }
        if self.phase != ExpansionPhase::Initial {
            return Err(SequencerError::InvalidPhase { phase: self.phase, operation: "unlock" });
        }

        self.enter(ExpansionPhase::BorderExpanding);
        self.border_deadline = Some(now + self.config.border.total());
        let id = self.ids.next(AnimationChannel::Frame);

        Ok(vec![
            Action::PhaseEntered(ExpansionPhase::BorderExpanding),
            Action::AnimateFrame { id, style: FrameStyle::PULSE, transition: self.config.border },
        ])
    }

    /// Fire due deadlines.
    pub fn tick(&mut self, now: Instant) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let due = |deadline: Option<Instant>| deadline.is_some_and(|d| now >= d);

        match self.phase {
            ExpansionPhase::BorderExpanding if due(self.border_deadline) => {
                self.border_deadline = None;
                self.expand_to_viewport()
            },
            ExpansionPhase::ContentSettled if due(self.site_ready_deadline) => {
                self.site_ready_deadline = None;
                self.site_ready = true;
                debug!("site ready");
                vec![Action::SiteReady(true)]
            },
            _ => Vec::new(),
        }
    }

    fn expand_to_viewport(&mut self) -> Vec<Action> {
        self.enter(ExpansionPhase::FullyExpanded);
        let bounds = self.ids.next(AnimationChannel::Frame);
        let fade = self.ids.next(AnimationChannel::LockScreen);
        self.bounds = Some(bounds);
        self.fade = Some(fade);

        vec![
            Action::PhaseEntered(ExpansionPhase::FullyExpanded),
            Action::AnimateFrame {
                id: bounds,
                style: FrameStyle::FULLSCREEN,
                transition: self.config.bounds,
            },
            Action::FadeOutLockScreen { id: fade, transition: self.config.fade },
            Action::RevealDestination { transition: self.config.reveal },
        ]
    }

    /// Surface reported that a frame or lock-screen animation finished.
    pub fn on_animation_complete(&mut self, id: AnimationId, now: Instant) -> Vec<Action> {
        if self.torn_down {
            trace!(?id, "ignoring completion after teardown");
            return Vec::new();
        }

        if self.fade == Some(id) {
            self.fade = None;
            self.lock_screen_faded = true;
            debug!("lock screen faded out");
            return Vec::new();
        }

        if self.bounds != Some(id) || self.phase != ExpansionPhase::FullyExpanded {
            trace!(?id, phase = ?self.phase, "ignoring frame animation completion");
            return Vec::new();
        }

        self.bounds = None;
        self.enter(ExpansionPhase::ContentSettled);
        self.content_scrollable = true;
        self.site_ready_deadline = Some(now + self.config.site_ready_delay);

        vec![
            Action::PhaseEntered(ExpansionPhase::ContentSettled),
            Action::ContentScrollable(true),
            Action::DismissOverlay { transition: self.config.overlay_exit },
        ]
    }

    /// Cancel all deadlines and withdraw the site-ready signal.
    pub fn teardown(&mut self) -> Vec<Action> {
        self.torn_down = true;
        self.border_deadline = None;
        self.site_ready_deadline = None;
        self.bounds = None;
        self.fade = None;

        if std::mem::take(&mut self.site_ready) { vec![Action::SiteReady(false)] } else { Vec::new() }
    }

    fn enter(&mut self, phase: ExpansionPhase) {
        info!(from = ?self.phase, to = ?phase, "expansion phase");
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn find_id(actions: &[Action], channel: AnimationChannel) -> AnimationId {
        actions
            .iter()
            .filter_map(Action::animation_id)
            .find(|id| id.channel == channel)
            .expect("animation id")
    }

    #[test]
    fn full_sequence_in_order() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());

        let actions = ctl.on_unlock(t0).unwrap();
        assert_eq!(actions[0], Action::PhaseEntered(ExpansionPhase::BorderExpanding));
        assert_eq!(ctl.next_deadline(), Some(t0 + ms(150)));

        assert!(ctl.tick(t0 + ms(149)).is_empty());
        let actions = ctl.tick(t0 + ms(150));
        assert_eq!(actions[0], Action::PhaseEntered(ExpansionPhase::FullyExpanded));
        assert!(!ctl.content_scrollable());

        let bounds = find_id(&actions, AnimationChannel::Frame);
        let actions = ctl.on_animation_complete(bounds, t0 + ms(400));
        assert_eq!(actions[0], Action::PhaseEntered(ExpansionPhase::ContentSettled));
        assert!(ctl.content_scrollable());
        assert!(!ctl.site_ready());

        assert!(ctl.tick(t0 + ms(474)).is_empty());
        assert_eq!(ctl.tick(t0 + ms(475)), vec![Action::SiteReady(true)]);
        assert!(ctl.site_ready());
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn unlock_twice_is_rejected() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());
        ctl.on_unlock(t0).unwrap();
        assert!(matches!(
            ctl.on_unlock(t0),
            Err(SequencerError::InvalidPhase { phase: ExpansionPhase::BorderExpanding, .. })
        ));
    }

    #[test]
    fn settle_waits_for_bounds_completion() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());
        ctl.on_unlock(t0).unwrap();
        let actions = ctl.tick(t0 + ms(150));

        // The fade finishing is not enough, nor is time passing.
        let fade = find_id(&actions, AnimationChannel::LockScreen);
        assert!(ctl.on_animation_complete(fade, t0 + ms(400)).is_empty());
        assert!(ctl.lock_screen_faded());
        assert!(ctl.tick(t0 + ms(5_000)).is_empty());
        assert_eq!(ctl.phase(), ExpansionPhase::FullyExpanded);
        assert!(!ctl.content_scrollable());
    }

    #[test]
    fn border_pulse_completion_is_not_the_bounds_token() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());
        let pulse = find_id(&ctl.on_unlock(t0).unwrap(), AnimationChannel::Frame);
        ctl.tick(t0 + ms(150));
        assert!(ctl.on_animation_complete(pulse, t0 + ms(160)).is_empty());
        assert_eq!(ctl.phase(), ExpansionPhase::FullyExpanded);
    }

    #[test]
    fn teardown_cancels_everything() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());
        ctl.on_unlock(t0).unwrap();
        let actions = ctl.tick(t0 + ms(150));
        let bounds = find_id(&actions, AnimationChannel::Frame);

        assert!(ctl.teardown().is_empty());
        assert!(ctl.on_animation_complete(bounds, t0 + ms(400)).is_empty());
        assert!(ctl.tick(t0 + ms(10_000)).is_empty());
        assert_eq!(ctl.phase(), ExpansionPhase::FullyExpanded);
        assert_eq!(ctl.next_deadline(), None);
    }

    #[test]
    fn teardown_withdraws_site_ready() {
        let t0 = Instant::now();
        let mut ctl = TransitionController::new(ExpansionConfig::default());
        ctl.on_unlock(t0).unwrap();
        let bounds = find_id(&ctl.tick(t0 + ms(150)), AnimationChannel::Frame);
        ctl.on_animation_complete(bounds, t0 + ms(400));
        ctl.tick(t0 + ms(475));

        assert_eq!(ctl.teardown(), vec![Action::SiteReady(false)]);
        assert!(!ctl.site_ready());
    }

    #[test]
    fn phases_advance_one_step_at_a_time() {
        let mut phase = ExpansionPhase::Initial;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            assert!(next > phase);
            phase = next;
            seen.push(phase);
        }
        assert_eq!(seen.len(), 4);
    }
}
