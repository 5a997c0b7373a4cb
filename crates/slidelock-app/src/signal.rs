//! Page-wide signals.
//!
//! Components that need to reach across the page (the dock waiting for the
//! site to be ready, a skill chip asking the projects list to focus an
//! entry) publish here instead of reaching into each other.

use std::fmt;

use tracing::trace;

use crate::theme::Theme;

/// Link target that means "no project page".
pub const PLACEHOLDER_LINK: &str = "#";

/// A page-wide notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// Site-ready marker raised or withdrawn.
    SiteReady(bool),
    /// Scroll to and highlight a project by name.
    FocusProject(String),
    /// Theme changed.
    ThemeChanged(Theme),
}

/// Subscription handle for [`SignalBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&Signal) + Send>;

/// Synchronous publish/subscribe bus.
#[derive(Default)]
pub struct SignalBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalBus").field("listeners", &self.listeners.len()).finish()
    }
}

impl SignalBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; called in registration order.
    pub fn subscribe(&mut self, listener: impl FnMut(&Signal) + Send + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    /// Deliver `signal` to every listener; returns how many received it.
    pub fn publish(&mut self, signal: &Signal) -> usize {
        trace!(?signal, listeners = self.listeners.len(), "publish");
        for (_, listener) in &mut self.listeners {
            listener(signal);
        }
        self.listeners.len()
    }

    /// Ask the projects list to focus `name`.
    ///
    /// Skills linked to the placeholder target publish nothing.
    pub fn focus_project(&mut self, name: &str) -> bool {
        if name.is_empty() || name == PLACEHOLDER_LINK {
            return false;
        }
        self.publish(&Signal::FocusProject(name.to_owned()));
        true
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
