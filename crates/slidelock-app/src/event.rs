//! Application events
//!
//! Everything a driver can report to the [`crate::App`] state machine.

use slidelock_core::InputEvent;

use crate::{sections::Section, theme::Theme};

/// Events delivered to the App state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Gesture input or an animation completion for the unlock sequencer.
    Input(InputEvent),

    /// User toggled the theme.
    ToggleTheme,

    /// User picked a theme.
    SetTheme(Theme),

    /// The system colour-scheme preference changed.
    SystemThemeChanged(Theme),

    /// Destination content scrolled.
    ContentScrolled {
        /// New scroll offset.
        scroll_top: f64,
        /// Height of the visible area.
        viewport_height: f64,
    },

    /// Header link clicked.
    JumpToSection(Section),

    /// Skill chip clicked; `link` is the project name or `"#"`.
    FocusProject(String),

    /// Viewport resized.
    Resize {
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },

    /// User asked to quit.
    Quit,
}

impl From<InputEvent> for AppEvent {
    fn from(event: InputEvent) -> Self {
        AppEvent::Input(event)
    }
}
