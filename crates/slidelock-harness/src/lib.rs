//! Deterministic simulation harness for the unlock sequencer.
//!
//! A virtual clock, a scripted [`SimDriver`] and a scenario builder let the
//! production [`slidelock_app::Runtime`] run to completion in microseconds
//! with every deadline, animation completion and input landing at an exact,
//! reproducible instant.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod scenario;
pub mod script;
pub mod sim_driver;

pub use clock::SimClock;
pub use script::{Script, Step};
pub use sim_driver::{SimDriver, SimError, TraceEntry};
