//! Reusable oracles.
//!
//! Each helper checks one property of the final [`World`] and explains
//! itself on failure. Combine them with [`all_of`].

use slidelock_app::{Signal, Theme};
use slidelock_core::{Action, ExpansionPhase, SharedElement, Trigger, View};

use crate::scenario::{OracleFn, World};

/// Run every oracle; fail on the first failure.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| {
        for oracle in &oracles {
            oracle(world)?;
        }
        Ok(())
    })
}

/// The unlock edge fired exactly once.
pub fn unlocked_once() -> OracleFn {
    Box::new(|world| match world.unlocks().len() {
        1 => Ok(()),
        n => Err(format!("{}: expected one unlock, saw {n}", world.name())),
    })
}

/// The unlock edge fired exactly once, through `trigger`.
pub fn unlocked_by(trigger: Trigger) -> OracleFn {
    Box::new(move |world| match world.unlocks().as_slice() {
        [t] if *t == trigger => Ok(()),
        other => Err(format!("{}: expected unlock by {trigger:?}, saw {other:?}", world.name())),
    })
}

/// The page never unlocked.
pub fn still_locked() -> OracleFn {
    Box::new(|world| {
        if world.unlocks().is_empty() && world.phases().is_empty() {
            Ok(())
        } else {
            Err(format!(
                "{}: expected no unlock, saw {:?} / {:?}",
                world.name(),
                world.unlocks(),
                world.phases()
            ))
        }
    })
}

/// Phases were entered one step at a time, never skipped or repeated.
pub fn phases_in_order() -> OracleFn {
    Box::new(|world| {
        let mut expected = ExpansionPhase::Initial;
        for phase in world.phases() {
            if Some(phase) != expected.next() {
                return Err(format!(
                    "{}: phase {phase:?} entered after {expected:?}",
                    world.name()
                ));
            }
            expected = phase;
        }
        Ok(())
    })
}

/// The expansion ran to the end and the site became ready.
pub fn settled() -> OracleFn {
    Box::new(|world| {
        let phases = world.phases();
        if phases.last() != Some(&ExpansionPhase::ContentSettled) {
            return Err(format!("{}: never settled, phases {phases:?}", world.name()));
        }
        if world.position(&Action::SiteReady(true)).is_none() {
            return Err(format!("{}: site-ready never raised", world.name()));
        }
        Ok(())
    })
}

/// Content only became scrollable after the expansion settled.
pub fn scroll_locked_until_settled() -> OracleFn {
    Box::new(|world| {
        let Some(scrollable) = world.position(&Action::ContentScrollable(true)) else {
            return Ok(());
        };
        match world.position(&Action::PhaseEntered(ExpansionPhase::ContentSettled)) {
            Some(settled) if settled < scrollable => Ok(()),
            _ => Err(format!("{}: content scrollable before settling", world.name())),
        }
    })
}

/// Shared identities always had a holder: the destination mounted (with
/// interpolations for every element) before the lock screen unmounted.
pub fn shared_elements_continuous() -> OracleFn {
    Box::new(|world| {
        let Some(unmount) = world.position(&Action::UnmountView(View::LockScreen)) else {
            return Ok(());
        };
        let Some(mount) = world.position(&Action::MountView(View::Destination)) else {
            return Err(format!("{}: lock screen unmounted with no destination", world.name()));
        };
        if mount > unmount {
            return Err(format!("{}: destination mounted after lock screen left", world.name()));
        }
        for element in SharedElement::ALL {
            let interpolated = world.trace()[mount..unmount]
                .iter()
                .any(|e| matches!(e.action, Action::Interpolate { element: el, .. } if el == element));
            if !interpolated {
                return Err(format!("{}: {} was not interpolated", world.name(), element.key()));
            }
        }
        Ok(())
    })
}

/// The runtime stopped the driver and no sequencer deadline survived.
pub fn clean_shutdown() -> OracleFn {
    Box::new(|world| {
        if !world.stopped() {
            return Err(format!("{}: driver not stopped", world.name()));
        }
        if world.deadline_pending() {
            return Err(format!("{}: deadline armed after teardown", world.name()));
        }
        Ok(())
    })
}

/// A raised site-ready marker was withdrawn on teardown, on the surface
/// and on the signal bus.
pub fn site_ready_withdrawn() -> OracleFn {
    Box::new(|world| {
        if world.position(&Action::SiteReady(true)).is_none() {
            return Ok(());
        }
        if world.surface().site_ready() {
            return Err(format!("{}: site-ready outlived the page", world.name()));
        }
        match world.signals().iter().rev().find(|s| matches!(s, Signal::SiteReady(_))) {
            Some(Signal::SiteReady(false)) => Ok(()),
            other => Err(format!("{}: last site-ready signal {other:?}", world.name())),
        }
    })
}

/// `theme` was the last choice persisted.
pub fn theme_persisted(theme: Theme) -> OracleFn {
    Box::new(move |world| match world.persisted().last() {
        Some(t) if *t == theme => Ok(()),
        other => Err(format!("{}: expected {theme} persisted, got {other:?}", world.name())),
    })
}

/// At least `n` wheel events had their default scroll suppressed.
pub fn scrolls_suppressed(n: u64) -> OracleFn {
    Box::new(move |world| {
        let seen = world.surface().suppressed_scrolls();
        if seen >= n {
            Ok(())
        } else {
            Err(format!("{}: {seen} scrolls suppressed, expected {n}", world.name()))
        }
    })
}
