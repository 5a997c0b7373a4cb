//! Scenario testing framework.
//!
//! A scenario describes a page configuration and a scripted user, runs the
//! production runtime against the simulated driver, and hands the
//! resulting [`World`] to an oracle. The oracle is mandatory: a scenario
//! without verification cannot be run.

mod builder;
pub mod oracle;
mod world;

pub use builder::{RunnableScenario, Scenario};
pub use world::World;

/// Verification function run against the final world.
pub type OracleFn = Box<dyn Fn(&World) -> Result<(), String>>;
