//! Terminal front-end for the slide-to-unlock portfolio
//!
//! Implements [`slidelock_app::Driver`] over crossterm and ratatui, and
//! keeps the theme preference in redb. The page itself runs in the generic
//! [`slidelock_app::Runtime`], exactly as it does under simulation.
//!
//! # Components
//!
//! - [`terminal`]: [`TerminalDriver`], crossterm input and ratatui output
//! - [`input`]: Key and mouse mapping, drag tracking
//! - [`ui`]: Drawing the lock screen and the destination
//! - [`store`]: `redb`-backed theme preference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod store;
pub mod terminal;
pub mod ui;

pub use input::InputState;
pub use slidelock_app::{App, AppAction, AppEvent, Driver, Runtime};
pub use store::{RedbThemeStore, StoreError};
pub use terminal::{TerminalDriver, TerminalError};
pub use ui::{Hints, Scene};
