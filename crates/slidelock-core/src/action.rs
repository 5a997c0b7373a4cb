//! Actions returned by the unlock state machines.
//!
//! The rendering surface executes these. None of them carry behaviour; they
//! describe what should be visible and how it should move.

use serde::{Deserialize, Serialize};

use crate::{
    bridge::SharedElement,
    easing::{Motion, Transition},
    expansion::{ExpansionPhase, FrameStyle},
};

/// Which animated property an [`AnimationId`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationChannel {
    /// Horizontal position of the drag handle.
    Handle,
    /// Bounds and border of the phone frame.
    Frame,
    /// Opacity of the lock-screen content.
    LockScreen,
}

/// Identifies one requested animation.
///
/// The surface echoes it back on completion; a machine only reacts to the
/// id it is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId {
    /// Animated property.
    pub channel: AnimationChannel,
    /// Per-channel sequence number, strictly increasing.
    pub seq: u64,
}

/// Hands out [`AnimationId`]s for one machine.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn next(&mut self, channel: AnimationChannel) -> AnimationId {
        self.next += 1;
        AnimationId { channel, seq: self.next }
    }
}

/// Input channel that won the unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// Idle timer elapsed.
    Idle,
    /// Accumulated wheel delta crossed the threshold.
    Scroll,
    /// Drag released past the threshold.
    Drag,
}

/// One of the two layouts that can hold shared elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum View {
    /// Phone lock screen.
    LockScreen,
    /// Website content.
    Destination,
}

/// Effect requested from the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Suppress the default scroll for the wheel event being handled.
    PreventDefaultScroll,

    /// Place the handle immediately (input is tracking it).
    SetHandle {
        /// Offset from the start of the track.
        x: f64,
    },

    /// Animate the handle to a resting position.
    AnimateHandle {
        /// Completion token.
        id: AnimationId,
        /// Target offset (0 or the full track).
        to: f64,
        /// How the handle travels.
        motion: Motion,
    },

    /// Pressed feedback on the handle.
    HandlePressed(bool),

    /// Opacity of the "slide to answer" label.
    SetLabelOpacity(f64),

    /// The one-time locked to unlocked edge.
    Unlocked {
        /// Channel that won.
        trigger: Trigger,
    },

    /// The expansion entered a new phase.
    PhaseEntered(ExpansionPhase),

    /// Animate the phone frame to a style.
    AnimateFrame {
        /// Completion token.
        id: AnimationId,
        /// Target style.
        style: FrameStyle,
        /// Timing.
        transition: Transition,
    },

    /// Fade the lock-screen content to transparent.
    FadeOutLockScreen {
        /// Completion token.
        id: AnimationId,
        /// Timing.
        transition: Transition,
    },

    /// Fade and scale the destination content in.
    RevealDestination {
        /// Timing.
        transition: Transition,
    },

    /// Mount a view.
    MountView(View),

    /// Unmount a view.
    UnmountView(View),

    /// Animate a shared element from its old layout to its new one.
    Interpolate {
        /// Element identity.
        element: SharedElement,
        /// Timing.
        transition: Transition,
    },

    /// Whether the destination content may scroll.
    ContentScrollable(bool),

    /// Fade out the background overlay.
    DismissOverlay {
        /// Timing.
        transition: Transition,
    },

    /// Site-ready marker for dependents such as the dock.
    SiteReady(bool),
}

impl Action {
    /// Completion token, for actions that start a tracked animation.
    pub fn animation_id(&self) -> Option<AnimationId> {
        match self {
            Action::AnimateHandle { id, .. }
            | Action::AnimateFrame { id, .. }
            | Action::FadeOutLockScreen { id, .. } => Some(*id),
            _ => None,
        }
    }
}
