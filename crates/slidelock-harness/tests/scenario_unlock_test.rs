//! End-to-end unlock scenarios on virtual time.
//!
//! Each scenario runs the production runtime with the simulated driver and
//! checks the recorded trace with oracles.

use std::time::Duration;

use slidelock_app::{AppEvent, Section, Signal, Theme};
use slidelock_core::{Action, ExpansionPhase, Trigger};
use slidelock_harness::{
    Script,
    scenario::{Scenario, oracle},
};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Oracles every completed unlock must satisfy.
fn full_sequence(trigger: Trigger) -> slidelock_harness::scenario::OracleFn {
    oracle::all_of(vec![
        oracle::unlocked_by(trigger),
        oracle::phases_in_order(),
        oracle::settled(),
        oracle::scroll_locked_until_settled(),
        oracle::shared_elements_continuous(),
        oracle::clean_shutdown(),
        oracle::site_ready_withdrawn(),
    ])
}

#[test]
fn idle_unlock_runs_full_sequence() {
    let result = Scenario::new("idle unlock").oracle(full_sequence(Trigger::Idle)).run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn idle_unlock_timeline() {
    let result = Scenario::new("idle timeline")
        .oracle(Box::new(|world| {
            let at = |pred: fn(&Action) -> bool| world.first_at(pred);

            // 10 s idle, 800 ms handle spring
            assert_eq!(at(|a| matches!(a, Action::Unlocked { .. })), Some(ms(10_800)));
            // 150 ms border pulse
            assert_eq!(
                at(|a| *a == Action::PhaseEntered(ExpansionPhase::FullyExpanded)),
                Some(ms(10_950))
            );
            // 250 ms bounds animation
            assert_eq!(
                at(|a| *a == Action::PhaseEntered(ExpansionPhase::ContentSettled)),
                Some(ms(11_200))
            );
            // 75 ms grace
            assert_eq!(at(|a| *a == Action::SiteReady(true)), Some(ms(11_275)));
            Ok(())
        }))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn drag_past_threshold_unlocks() {
    let result = Scenario::new("drag unlock")
        .script(Script::new().drag(1_000, 180.0, 300, 6))
        .oracle(oracle::all_of(vec![
            full_sequence(Trigger::Drag),
            Box::new(|world| {
                assert_eq!(world.first_at(|a| matches!(a, Action::Unlocked { .. })), Some(ms(1_600)));
                assert!(world.find(|a| *a == Action::HandlePressed(true)).count() == 1);
                Ok(())
            }),
        ]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn short_drag_springs_back_and_disarms_idle() {
    let result = Scenario::new("short drag")
        .script(Script::new().drag(500, 100.0, 200, 4))
        .oracle(oracle::all_of(vec![
            oracle::still_locked(),
            oracle::clean_shutdown(),
            Box::new(|world| {
                let back = world
                    .find(|a| matches!(a, Action::AnimateHandle { to, .. } if *to == 0.0))
                    .count();
                assert_eq!(back, 1, "handle should spring back once");
                assert_eq!(world.surface().label_opacity(), 1.0);
                Ok(())
            }),
        ]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn noisy_wheel_unlocks_once() {
    let result = Scenario::new("noisy wheel")
        .script(Script::new().wheel_burst(42, 2_000, 40, 16, 30.0))
        .oracle(oracle::all_of(vec![full_sequence(Trigger::Scroll), oracle::scrolls_suppressed(20)]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn partial_wheel_falls_back_to_idle_unlock() {
    // 100 * 0.5 = 50, well short of 140; the idle timer still fires
    let result = Scenario::new("partial wheel")
        .script(Script::new().wheel(1_000, 100.0))
        .oracle(oracle::all_of(vec![
            full_sequence(Trigger::Idle),
            Box::new(|world| {
                let committed = world
                    .first_at(|a| matches!(a, Action::AnimateHandle { to, .. } if *to == 200.0));
                assert_eq!(committed, Some(ms(10_000)));
                Ok(())
            }),
        ]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn drag_wins_race_with_pending_wheel_commit() {
    // 300 * 0.5 = 150 crosses 140 and arms a 200 ms debounce; the drag
    // releases before it elapses.
    let result = Scenario::new("wheel vs drag")
        .script(Script::new().wheel(1_000, 300.0).drag(1_050, 180.0, 100, 2))
        .oracle(full_sequence(Trigger::Drag))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn unusable_track_unlocks_on_first_forward_motion() {
    let result = Scenario::new("zero-width track")
        .track_width(40.0)
        .script(Script::new().wheel(1_000, 2.0))
        .oracle(full_sequence(Trigger::Scroll))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn quit_mid_expansion_tears_down() {
    let result = Scenario::new("quit mid expansion")
        .script(Script::new().quit(10_900))
        .oracle(oracle::all_of(vec![
            oracle::unlocked_once(),
            oracle::phases_in_order(),
            oracle::clean_shutdown(),
            Box::new(|world| {
                assert_eq!(world.phases(), vec![ExpansionPhase::BorderExpanding]);
                assert!(world.position(&Action::SiteReady(true)).is_none());
                assert!(world.elapsed() < ms(11_000));
                Ok(())
            }),
        ]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn theme_toggle_is_persisted() {
    let result = Scenario::new("theme toggle")
        .stored_theme(Theme::Dark)
        .run_for(ms(2_000))
        .script(
            Script::new()
                .at(100, AppEvent::ToggleTheme)
                .at(200, AppEvent::SystemThemeChanged(Theme::Dark)),
        )
        .oracle(oracle::all_of(vec![
            oracle::theme_persisted(Theme::Light),
            Box::new(|world| {
                assert_eq!(world.view().theme, Theme::Light);
                assert_eq!(world.signals(), &[Signal::ThemeChanged(Theme::Light)]);
                Ok(())
            }),
        ]))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn header_link_scrolls_settled_content() {
    let result = Scenario::new("jump to contact")
        .script(
            Script::new()
                .at(5_000, AppEvent::JumpToSection(Section::Skills))
                .at(12_000, AppEvent::JumpToSection(Section::Contact)),
        )
        .oracle(Box::new(|world| {
            assert_eq!(world.view().active_section, Section::Contact);
            assert_eq!(world.surface().scroll_top(), 3_680.0);
            Ok(())
        }))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}

#[test]
fn jump_before_settle_is_ignored() {
    let result = Scenario::new("jump while locked")
        .run_for(ms(5_000))
        .script(Script::new().at(1_000, AppEvent::JumpToSection(Section::Contact)))
        .oracle(Box::new(|world| {
            assert_eq!(world.view().active_section, Section::About);
            assert_eq!(world.surface().scroll_top(), 0.0);
            Ok(())
        }))
        .run();
    assert!(result.is_ok(), "scenario should succeed: {:?}", result);
}
