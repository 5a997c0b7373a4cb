//! Tunable thresholds and durations.
//!
//! None of these numbers are load-bearing: the defaults reproduce the
//! reference feel (10 s idle unlock, 70% commit threshold, 150 ms border
//! pulse, 250 ms expansion) and front-ends may override any of them.
//! Durations serialize as integer milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    easing::{Curve, Motion, Transition},
    error::ConfigError,
};

/// Serde adapter storing a [`Duration`] as whole milliseconds.
pub(crate) mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Gesture Tracker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Time without interaction before the lock screen opens on its own.
    #[serde(with = "millis")]
    pub idle_delay: Duration,
    /// Fraction of the track a gesture must cover to commit.
    pub commit_ratio: f64,
    /// Multiplier applied to wheel deltas (< 1 desensitizes).
    pub scroll_damping: f64,
    /// Debounce between crossing the threshold by wheel and committing.
    #[serde(with = "millis")]
    pub scroll_commit_delay: Duration,
    /// Width of the drag handle.
    pub handle_width: f64,
    /// Inner padding of the slide track.
    pub track_padding: f64,
    /// Handle travel to the end of the track for an idle unlock.
    pub idle_commit_motion: Motion,
    /// Handle travel to the end of the track for a wheel or drag unlock.
    pub manual_commit_motion: Motion,
    /// Handle travel back to the start after a rejected drag.
    pub spring_back_motion: Motion,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            idle_delay: Duration::from_secs(10),
            commit_ratio: 0.7,
            scroll_damping: 0.5,
            scroll_commit_delay: Duration::from_millis(200),
            handle_width: 55.0,
            track_padding: 15.0,
            idle_commit_motion: Motion::timed_spring(800),
            manual_commit_motion: Motion::timed_spring(300),
            spring_back_motion: Motion::Spring { stiffness: 500.0, damping: 30.0 },
        }
    }
}

/// Transition Controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Border thickening pulse right after unlock.
    pub border: Transition,
    /// Phone frame to full viewport.
    pub bounds: Transition,
    /// Lock-screen content fade-out, concurrent with `bounds`.
    pub fade: Transition,
    /// Destination content entrance.
    pub reveal: Transition,
    /// Background overlay fade once content settles.
    pub overlay_exit: Transition,
    /// Interpolation of shared elements between the two layouts.
    pub shared_element: Transition,
    /// Grace period between settling and the site-ready signal.
    #[serde(with = "millis")]
    pub site_ready_delay: Duration,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            border: Transition::millis(150, Curve::EaseOut),
            bounds: Transition::millis(250, Curve::EaseInOut),
            fade: Transition::millis(250, Curve::EaseOut),
            reveal: Transition::millis(400, Curve::EaseOut)
                .with_delay(Duration::from_millis(100)),
            overlay_exit: Transition::millis(600, Curve::EaseOut),
            shared_element: Transition::millis(500, Curve::EaseInOut),
            site_ready_delay: Duration::from_millis(75),
        }
    }
}

/// Configuration for the whole [`crate::UnlockSequencer`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Gesture Tracker settings.
    pub gesture: GestureConfig,
    /// Transition Controller settings.
    pub expansion: ExpansionConfig,
}

impl SequencerConfig {
    /// Check every value the machines rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gesture;
        if !(g.commit_ratio > 0.0 && g.commit_ratio <= 1.0) {
            return Err(ConfigError::CommitRatio(g.commit_ratio));
        }
        if !(g.scroll_damping > 0.0 && g.scroll_damping <= 1.0) {
            return Err(ConfigError::ScrollDamping(g.scroll_damping));
        }
        for (name, value) in [("handle width", g.handle_width), ("track padding", g.track_padding)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Geometry { name, value });
            }
        }
        if g.idle_delay.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "idle delay" });
        }

        let e = &self.expansion;
        if e.border.duration.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "border pulse" });
        }
        if e.bounds.duration.is_zero() {
            return Err(ConfigError::ZeroDuration { name: "bounds animation" });
        }
        if e.fade.total() > e.bounds.total() {
            return Err(ConfigError::FadeOutlastsBounds {
                fade: e.fade.total(),
                bounds: e.bounds.total(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(SequencerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let mut config = SequencerConfig::default();
        config.gesture.commit_ratio = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::CommitRatio(0.0)));

        config.gesture.commit_ratio = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::CommitRatio(_))));
    }

    #[test]
    fn rejects_amplifying_damping() {
        let mut config = SequencerConfig::default();
        config.gesture.scroll_damping = 2.0;
        assert_eq!(config.validate(), Err(ConfigError::ScrollDamping(2.0)));
    }

    #[test]
    fn rejects_fade_longer_than_bounds() {
        let mut config = SequencerConfig::default();
        config.expansion.fade = Transition::millis(400, Curve::EaseOut);
        assert!(matches!(config.validate(), Err(ConfigError::FadeOutlastsBounds { .. })));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SequencerConfig =
            serde_json::from_str(r#"{ "gesture": { "idle_delay": 2500, "commit_ratio": 0.5 } }"#)
                .unwrap();
        assert_eq!(config.gesture.idle_delay, Duration::from_millis(2500));
        assert_eq!(config.gesture.commit_ratio, 0.5);
        assert_eq!(config.gesture.scroll_damping, 0.5);
        assert_eq!(config.expansion, ExpansionConfig::default());
    }

    #[test]
    fn durations_serialize_as_millis() {
        let json = serde_json::to_value(ExpansionConfig::default()).unwrap();
        assert_eq!(json["site_ready_delay"], 75);
        assert_eq!(json["bounds"]["duration"], 250);
        assert_eq!(json["bounds"]["curve"], "ease-in-out");
    }
}
