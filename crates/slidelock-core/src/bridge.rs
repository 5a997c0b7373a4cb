//! Shared-Element Bridge: layout identity across the two views.
//!
//! Both the lock screen and the destination declare the same identity keys
//! for the photo, the name and the header surface. While both views are
//! mounted each key has two holders, and the surface interpolates between
//! the two layouts instead of cross-fading unrelated elements. A key is
//! released once neither view holds it.
//!
//! The bridge does not time anything itself. It follows the controller:
//! the destination mounts when the expansion reaches
//! [`ExpansionPhase::FullyExpanded`], and the lock screen unmounts once its
//! fade has completed. The overlap between those two points guarantees no
//! key is ever without a holder.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    action::{Action, View},
    easing::Transition,
    error::BridgeError,
    expansion::ExpansionPhase,
};

/// Visual anchors that persist across the unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SharedElement {
    /// Profile photograph.
    HeroPhoto,
    /// Subject name.
    HeroName,
    /// Dynamic island on the lock screen, header bar on the site.
    Header,
}

impl SharedElement {
    /// Every shared identity.
    pub const ALL: [Self; 3] = [Self::HeroPhoto, Self::HeroName, Self::Header];

    /// Layout identity key.
    pub fn key(self) -> &'static str {
        match self {
            SharedElement::HeroPhoto => "hero-photo",
            SharedElement::HeroName => "hero-name",
            SharedElement::Header => "header",
        }
    }
}

/// Shared-Element Bridge.
#[derive(Debug, Clone)]
pub struct SharedElementBridge {
    holders: BTreeMap<SharedElement, BTreeSet<View>>,
    mounted: BTreeSet<View>,
    transition: Transition,
}

impl SharedElementBridge {
    /// Create a bridge with no views mounted.
    pub fn new(transition: Transition) -> Self {
        Self { holders: BTreeMap::new(), mounted: BTreeSet::new(), transition }
    }

    /// Register `view` as a holder of `element`. Idempotent.
    pub fn declare(&mut self, view: View, element: SharedElement) {
        self.holders.entry(element).or_default().insert(view);
    }

    /// Remove `view` as a holder of `element`.
    ///
    /// Returns `true` if the identity is now released entirely.
    pub fn withdraw(&mut self, view: View, element: SharedElement) -> Result<bool, BridgeError> {
        let Some(views) = self.holders.get_mut(&element) else {
            return Err(BridgeError::NotDeclared { element, view });
        };
        if !views.remove(&view) {
            return Err(BridgeError::NotDeclared { element, view });
        }
        if views.is_empty() {
            self.holders.remove(&element);
            debug!(key = element.key(), "shared element released");
            return Ok(true);
        }
        Ok(false)
    }

    /// Views currently holding `element`.
    pub fn holders(&self, element: SharedElement) -> Vec<View> {
        self.holders.get(&element).map(|v| v.iter().copied().collect()).unwrap_or_default()
    }

    /// Whether two views hold `element` right now.
    pub fn is_overlapping(&self, element: SharedElement) -> bool {
        self.holders.get(&element).is_some_and(|v| v.len() > 1)
    }

    /// Whether `view` is mounted.
    pub fn is_mounted(&self, view: View) -> bool {
        self.mounted.contains(&view)
    }

    /// Whether every identity has at least one holder.
    pub fn is_continuous(&self) -> bool {
        SharedElement::ALL.iter().all(|e| self.holders.get(e).is_some_and(|v| !v.is_empty()))
    }

    /// Mount `view` and declare all of its identities.
    ///
    /// Identities already held elsewhere get an interpolation request.
    pub fn mount_view(&mut self, view: View) -> Vec<Action> {
        if !self.mounted.insert(view) {
            trace!(?view, "view already mounted");
            return Vec::new();
        }

        let mut actions = vec![Action::MountView(view)];
        for element in SharedElement::ALL {
            self.declare(view, element);
            if self.is_overlapping(element) {
                actions.push(Action::Interpolate { element, transition: self.transition });
            }
        }
        actions
    }

    /// Unmount `view` and withdraw all of its identities.
    pub fn unmount_view(&mut self, view: View) -> Vec<Action> {
        if !self.mounted.remove(&view) {
            return Vec::new();
        }
        for element in SharedElement::ALL {
            if let Err(e) = self.withdraw(view, element) {
                trace!(?view, error = %e, "identity already withdrawn");
            }
        }
        vec![Action::UnmountView(view)]
    }

    /// Follow an expansion phase change.
    pub fn on_phase(&mut self, phase: ExpansionPhase) -> Vec<Action> {
        match phase {
            ExpansionPhase::FullyExpanded => self.mount_view(View::Destination),
            ExpansionPhase::Initial
            | ExpansionPhase::BorderExpanding
            | ExpansionPhase::ContentSettled => Vec::new(),
        }
    }

    /// The lock screen has finished fading out.
    pub fn on_source_faded(&mut self) -> Vec<Action> {
        if !self.is_mounted(View::Destination) {
            // Never leave an identity without a holder.
            trace!("lock screen faded before destination mounted; keeping it");
            return Vec::new();
        }
        self.unmount_view(View::LockScreen)
    }

    /// Drop every holder.
    pub fn teardown(&mut self) {
        self.holders.clear();
        self.mounted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Curve;

    fn bridge() -> SharedElementBridge {
        SharedElementBridge::new(Transition::millis(500, Curve::EaseInOut))
    }

    #[test]
    fn overlap_requests_interpolation() {
        let mut bridge = bridge();
        let actions = bridge.mount_view(View::LockScreen);
        assert_eq!(actions, vec![Action::MountView(View::LockScreen)]);

        let actions = bridge.on_phase(ExpansionPhase::FullyExpanded);
        assert_eq!(actions[0], Action::MountView(View::Destination));
        assert_eq!(actions.len(), 1 + SharedElement::ALL.len());
        for element in SharedElement::ALL {
            assert!(bridge.is_overlapping(element));
            assert_eq!(bridge.holders(element), vec![View::LockScreen, View::Destination]);
        }
    }

    #[test]
    fn source_unmount_leaves_destination_holding() {
        let mut bridge = bridge();
        bridge.mount_view(View::LockScreen);
        bridge.on_phase(ExpansionPhase::FullyExpanded);

        assert_eq!(bridge.on_source_faded(), vec![Action::UnmountView(View::LockScreen)]);
        assert!(bridge.is_continuous());
        for element in SharedElement::ALL {
            assert_eq!(bridge.holders(element), vec![View::Destination]);
        }
    }

    #[test]
    fn early_fade_keeps_the_only_holder() {
        let mut bridge = bridge();
        bridge.mount_view(View::LockScreen);
        assert!(bridge.on_source_faded().is_empty());
        assert!(bridge.is_continuous());
    }

    #[test]
    fn withdrawing_last_holder_releases_key() {
        let mut bridge = bridge();
        bridge.declare(View::LockScreen, SharedElement::Header);
        assert_eq!(bridge.withdraw(View::LockScreen, SharedElement::Header), Ok(true));
        assert_eq!(
            bridge.withdraw(View::LockScreen, SharedElement::Header),
            Err(BridgeError::NotDeclared { element: SharedElement::Header, view: View::LockScreen })
        );
    }

    #[test]
    fn unmount_after_manual_withdraw_still_unmounts() {
        let mut bridge = bridge();
        bridge.mount_view(View::LockScreen);
        bridge.mount_view(View::Destination);
        assert_eq!(bridge.withdraw(View::LockScreen, SharedElement::Header), Ok(false));

        assert_eq!(bridge.unmount_view(View::LockScreen), vec![Action::UnmountView(View::LockScreen)]);
        assert!(!bridge.is_mounted(View::LockScreen));
        assert!(bridge.is_continuous());
    }

    #[test]
    fn double_mount_is_tolerated() {
        let mut bridge = bridge();
        bridge.mount_view(View::LockScreen);
        assert!(bridge.mount_view(View::LockScreen).is_empty());
        assert_eq!(bridge.holders(SharedElement::HeroPhoto), vec![View::LockScreen]);
    }
}
