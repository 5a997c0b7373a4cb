//! Application layer for the slide-to-unlock portfolio
//!
//! Page composition and a generic runtime around the
//! [`slidelock_core::UnlockSequencer`], enabling deterministic simulation
//! testing with the same code that runs in the terminal.
//!
//! # Components
//!
//! - [`App`]: Page state (sequencer, theme, sections, signals)
//! - [`Surface`]: Reference rendering surface with sampled animations
//! - [`ThemeContext`]: Observable light/dark theme with a [`ThemeStore`]
//! - [`SignalBus`]: Page-wide publish/subscribe
//! - [`SectionTracker`]: Active section and first-scroll detection
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

mod action;
mod app;
mod driver;
mod event;
mod runtime;
pub mod sections;
pub mod signal;
pub mod surface;
pub mod theme;

pub use action::AppAction;
pub use app::{App, PageView, Screen};
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::{Runtime, RuntimeError};
pub use sections::{ScrollUpdate, Section, SectionLayout, SectionTracker};
pub use signal::{ListenerId, Signal, SignalBus};
pub use surface::{Animated, FrameSample, Surface};
pub use theme::{MemoryThemeStore, ParseThemeError, SubscriptionId, Theme, ThemeContext, ThemeStore};
