//! Theme context: one light/dark value, observable by any component.
//!
//! Resolution order on start: a stored user choice, then the system
//! preference, then light. Once the user picks a theme explicitly, system
//! preference changes are no longer followed.

use std::{collections::BTreeMap, convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

impl Theme {
    /// Stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised theme string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0:?}")]
pub struct ParseThemeError(pub String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_owned())),
        }
    }
}

/// Persistent storage for the user's theme choice.
pub trait ThemeStore {
    /// Storage failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stored choice, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Theme>, Self::Error>;

    /// Persist a choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&mut self, theme: Theme) -> Result<(), Self::Error>;
}

/// In-process theme store.
#[derive(Debug, Clone, Default)]
pub struct MemoryThemeStore {
    value: Option<Theme>,
}

impl MemoryThemeStore {
    /// Store holding `value`.
    pub fn with(value: Theme) -> Self {
        Self { value: Some(value) }
    }
}

impl ThemeStore for MemoryThemeStore {
    type Error = Infallible;

    fn load(&self) -> Result<Option<Theme>, Self::Error> {
        Ok(self.value)
    }

    fn save(&mut self, theme: Theme) -> Result<(), Self::Error> {
        self.value = Some(theme);
        Ok(())
    }
}

/// Handle returned by [`ThemeContext::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Theme) + Send>;

/// Theme value plus its subscribers.
pub struct ThemeContext {
    theme: Theme,
    explicit: bool,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_id: u64,
}

impl fmt::Debug for ThemeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeContext")
            .field("theme", &self.theme)
            .field("explicit", &self.explicit)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::init(None, None)
    }
}

impl ThemeContext {
    /// Resolve the starting theme.
    pub fn init(stored: Option<Theme>, system: Option<Theme>) -> Self {
        let theme = stored.or(system).unwrap_or_default();
        debug!(%theme, explicit = stored.is_some(), "theme resolved");
        Self { theme, explicit: stored.is_some(), listeners: BTreeMap::new(), next_id: 0 }
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the user has chosen a theme.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// User choice. Returns `true` if the theme changed.
    pub fn set(&mut self, theme: Theme) -> bool {
        self.explicit = true;
        self.apply(theme)
    }

    /// Flip the theme as a user choice and return the new value.
    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.flipped());
        self.theme
    }

    /// System preference changed. Ignored after an explicit choice.
    pub fn system_changed(&mut self, theme: Theme) -> bool {
        if self.explicit {
            return false;
        }
        self.apply(theme)
    }

    /// Register a listener called with every new theme.
    pub fn subscribe(&mut self, listener: impl FnMut(Theme) + Send + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn apply(&mut self, theme: Theme) -> bool {
        if theme == self.theme {
            return false;
        }
        self.theme = theme;
        debug!(%theme, listeners = self.listeners.len(), "theme changed");
        for listener in self.listeners.values_mut() {
            listener(theme);
        }
        true
    }
}
