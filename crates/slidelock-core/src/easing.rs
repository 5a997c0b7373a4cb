//! Easing curves and spring motion.
//!
//! Animation requests in [`crate::Action`] carry either a [`Transition`]
//! (fixed duration, cubic-bezier curve, optional delay) or a spring
//! [`Motion`]. The core never runs these itself; they describe intent for
//! the rendering surface, and give any surface (terminal, simulation) the
//! same sampling rules.
//!
//! # Springs
//!
//! Springs use the analytical solution of the damped harmonic oscillator
//! normalised to travel from 0.0 to 1.0:
//!
//! ```text
//! x(t) = 1 - e^(-ζω₀t) (cos(ω_d t) + (ζω₀ / ω_d) sin(ω_d t)),  ω_d = ω₀√(1 - ζ²)
//! ```
//!
//! A spring is considered settled once the envelope `e^(-ζω₀t)` drops below
//! [`REST_THRESHOLD`]; sampling at or past the settle time returns exactly
//! 1.0 so surfaces never leave a value resting short of its target.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::millis;

/// Envelope amplitude below which a spring counts as settled.
pub const REST_THRESHOLD: f64 = 0.001;

/// Newton iterations when inverting the bezier x(s).
const NEWTON_ITERATIONS: usize = 8;

/// Bisection fallback iterations when the slope is too flat for Newton.
const BISECTION_ITERATIONS: usize = 24;

/// Timing curve for tweened transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    /// Constant rate.
    Linear,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
}

impl Curve {
    /// Eased progress for linear progress `t` (clamped to [0, 1]).
    pub fn sample(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Curve::Linear => t,
            Curve::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Curve::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Curve::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
        }
    }
}

fn bezier(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }

    let mut s = t;
    for _ in 0..NEWTON_ITERATIONS {
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        let err = bezier(x1, x2, s) - t;
        if err.abs() < 1e-7 {
            return bezier(y1, y2, s);
        }
        s = (s - err / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..BISECTION_ITERATIONS {
        let x = bezier(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier(y1, y2, s)
}

/// A tweened transition: fixed duration, optional delay, easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Running time once started.
    #[serde(with = "millis")]
    pub duration: Duration,
    /// Wait before the value starts moving.
    #[serde(with = "millis", default)]
    pub delay: Duration,
    /// Timing curve.
    pub curve: Curve,
}

impl Transition {
    /// Transition of `ms` milliseconds with no delay.
    pub const fn millis(ms: u64, curve: Curve) -> Self {
        Self { duration: Duration::from_millis(ms), delay: Duration::ZERO, curve }
    }

    /// Same transition, starting after `delay`.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Delay plus duration.
    pub fn total(&self) -> Duration {
        self.delay + self.duration
    }

    /// Eased progress `elapsed` after the transition was requested.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if elapsed <= self.delay {
            return if self.duration.is_zero() && elapsed == self.delay { 1.0 } else { 0.0 };
        }
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        self.curve.sample(t)
    }
}

/// How a value travels to its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Motion {
    /// Fixed-duration tween.
    Tween(Transition),

    /// Spring tuned to settle within `duration`.
    TimedSpring {
        /// Settle time.
        #[serde(with = "millis")]
        duration: Duration,
        /// Overshoot amount in [0, 1); 0 is critically damped.
        bounce: f64,
    },

    /// Spring defined by physical constants (unit mass).
    Spring {
        /// Restoring force strength.
        stiffness: f64,
        /// Velocity drag.
        damping: f64,
    },
}

impl Motion {
    /// Spring that settles within `ms` milliseconds with a light bounce.
    pub const fn timed_spring(ms: u64) -> Self {
        Motion::TimedSpring { duration: Duration::from_millis(ms), bounce: 0.25 }
    }

    /// Time until the value is at rest on its target.
    pub fn duration(&self) -> Duration {
        match *self {
            Motion::Tween(transition) => transition.total(),
            Motion::TimedSpring { duration, .. } => duration,
            Motion::Spring { stiffness, damping } => {
                let (zeta, omega) = physical(stiffness, damping);
                let secs = -REST_THRESHOLD.ln() / (zeta.min(1.0) * omega);
                Duration::from_secs_f64(secs.min(10.0))
            },
        }
    }

    /// Normalised position (0.0 start, 1.0 target) `elapsed` after start.
    ///
    /// Springs may overshoot past 1.0 before settling.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.duration() {
            return 1.0;
        }
        match *self {
            Motion::Tween(transition) => transition.sample(elapsed),
            Motion::TimedSpring { duration, bounce } => {
                let zeta = (1.0 - bounce).clamp(0.05, 1.0);
                let omega = -REST_THRESHOLD.ln() / (zeta * duration.as_secs_f64().max(1e-3));
                damped(zeta, omega, elapsed.as_secs_f64())
            },
            Motion::Spring { stiffness, damping } => {
                let (zeta, omega) = physical(stiffness, damping);
                damped(zeta, omega, elapsed.as_secs_f64())
            },
        }
    }
}

fn physical(stiffness: f64, damping: f64) -> (f64, f64) {
    let stiffness = stiffness.max(0.1);
    let omega = stiffness.sqrt();
    let zeta = (damping.max(0.0) / (2.0 * omega)).max(0.05);
    (zeta, omega)
}

fn damped(zeta: f64, omega: f64, t: f64) -> f64 {
    if zeta < 1.0 {
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        1.0 - envelope * ((omega_d * t).cos() + (zeta * omega / omega_d) * (omega_d * t).sin())
    } else {
        1.0 - (-omega * t).exp() * (1.0 + omega * t)
    }
}
