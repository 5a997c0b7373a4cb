//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::Instant};

use slidelock_core::Action;

use crate::{App, AppEvent, theme::Theme};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`crate::Runtime`] handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for input, animation completions or `deadline`, whichever
    /// comes first.
    ///
    /// Returns an empty vector when the deadline passed with nothing to
    /// report. Animation completions from the driver's surface are
    /// reported as [`slidelock_core::InputEvent::AnimationComplete`].
    ///
    /// # Errors
    ///
    /// Returns an error if the input source fails.
    fn poll_event(
        &mut self,
        deadline: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send;

    /// Current time. Virtual in simulation.
    fn now(&self) -> Instant;

    /// Measured width of the slide track.
    fn track_width(&self) -> f64;

    /// Execute surface effects at `now`.
    fn apply(&mut self, actions: &[Action], now: Instant);

    /// Scroll the destination content to `offset`.
    fn scroll_to(&mut self, offset: f64, app: &App);

    /// Scroll the destination content by a wheel `delta`.
    fn scroll_by(&mut self, delta: f64, app: &App);

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Persist the user's theme choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error>;

    /// Release resources.
    fn stop(&mut self);
}
