//! Slide-to-unlock core logic
//!
//! Pure state machine logic for the lock-screen-to-website transition,
//! completely decoupled from rendering, input plumbing and clocks.
//!
//! # Architecture
//!
//! Every machine in this crate is deterministic: time is passed in as an
//! [`std::time::Instant`] on every call, timers are deadlines stored inside
//! the owning machine, and effects come back as declarative [`Action`]s for
//! a rendering surface to carry out. Animation completions flow back in
//! through [`InputEvent::AnimationComplete`], tagged with the
//! [`AnimationId`] the machine handed out, so late or superseded
//! completions can be recognised and dropped.
//!
//! The same code therefore runs under a real terminal front-end, in unit
//! tests that step time by hand, and in the simulation harness.
//!
//! # Components
//!
//! - [`gesture`]: Gesture Tracker (idle timer, wheel, drag, single commit)
//! - [`expansion`]: Transition Controller (phone frame to full viewport)
//! - [`bridge`]: Shared-Element Bridge (layout identity across views)
//! - [`sequencer`]: [`UnlockSequencer`], the composition of all three
//! - [`easing`]: Curves and spring motion attached to animation requests
//! - [`config`]: Tunable thresholds and durations
//! - [`error`]: Error types

pub mod action;
pub mod bridge;
pub mod config;
pub mod easing;
pub mod error;
pub mod expansion;
pub mod gesture;
pub mod sequencer;

pub use action::{Action, AnimationChannel, AnimationId, Trigger, View};
pub use bridge::{SharedElement, SharedElementBridge};
pub use config::{ExpansionConfig, GestureConfig, SequencerConfig};
pub use easing::{Curve, Motion, Transition};
pub use error::{BridgeError, ConfigError, SequencerError};
pub use expansion::{Extent, ExpansionPhase, FrameStyle, TransitionController};
pub use gesture::{GestureTracker, LockState};
pub use sequencer::{InputEvent, SequencerSnapshot, UnlockSequencer};
