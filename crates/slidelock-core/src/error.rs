//! Error types for the unlock state machines.

use std::time::Duration;

use thiserror::Error;

use crate::{action::View, bridge::SharedElement, expansion::ExpansionPhase};

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Commit ratio outside (0, 1].
    #[error("commit ratio must be in (0, 1], got {0}")]
    CommitRatio(f64),

    /// Scroll damping outside (0, 1].
    #[error("scroll damping must be in (0, 1], got {0}")]
    ScrollDamping(f64),

    /// Negative or non-finite handle geometry.
    #[error("{name} must be a finite, non-negative length, got {value}")]
    Geometry {
        /// Which length was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A duration that must be non-zero was zero.
    #[error("{name} must be non-zero")]
    ZeroDuration {
        /// Which duration was rejected.
        name: &'static str,
    },

    /// The lock-screen fade would still be running after the frame filled
    /// the viewport.
    #[error("lock-screen fade ({fade:?}) must not outlast the bounds animation ({bounds:?})")]
    FadeOutlastsBounds {
        /// Total fade time including delay.
        fade: Duration,
        /// Total bounds animation time including delay.
        bounds: Duration,
    },
}

/// Misuse of the sequencer lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// `mount` called twice.
    #[error("sequencer is already mounted")]
    AlreadyMounted,

    /// Operation on a sequencer that has been torn down.
    #[error("sequencer has been torn down")]
    TornDown,

    /// Operation not valid in the current expansion phase.
    #[error("cannot {operation} in phase {phase:?}")]
    InvalidPhase {
        /// Phase at the time of the call.
        phase: ExpansionPhase,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

/// Shared-element bookkeeping errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Withdrawing an identity the view never declared.
    #[error("{view:?} never declared {element:?}")]
    NotDeclared {
        /// Identity being withdrawn.
        element: SharedElement,
        /// View that tried to withdraw it.
        view: View,
    },
}
