//! Application actions
//!
//! Actions produced by the [`crate::App`] state machine for the runtime to
//! execute.

use slidelock_core::Action;

use crate::theme::Theme;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Hand effects to the rendering surface.
    Surface(Vec<Action>),

    /// Render the page.
    Render,

    /// Quit the application.
    Quit,

    /// Persist the user's theme choice.
    PersistTheme(Theme),

    /// Scroll the destination content to an absolute offset.
    ScrollContentTo {
        /// Target offset.
        offset: f64,
    },

    /// Let a wheel event scroll the destination content.
    ScrollContentBy {
        /// Wheel delta.
        delta: f64,
    },
}
