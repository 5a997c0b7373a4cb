//! Runtime orchestration against simulated and failing drivers.

use std::{
    future::{self, Future},
    time::{Duration, Instant},
};

use proptest::prelude::*;
use slidelock_app::{
    App, AppEvent, Driver, Runtime, RuntimeError, Section, SectionTracker, Theme, ThemeContext,
};
use slidelock_core::{Action, ExpansionPhase, SequencerConfig, Trigger, View};
use slidelock_harness::{Script, SimDriver};

fn app() -> App {
    App::new(SequencerConfig::default(), ThemeContext::default(), SectionTracker::stacked(80.0, 900.0))
        .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn idle_run_settles_and_tears_down() {
    let driver = SimDriver::new(Script::new(), Duration::from_secs(15));
    let mut runtime = Runtime::new(driver, app());
    runtime.run().await.unwrap();

    let (driver, _app) = runtime.into_parts();
    let surface = driver.surface();
    assert_eq!(surface.unlocked(), Some(Trigger::Idle));
    assert_eq!(surface.phase(), ExpansionPhase::ContentSettled);
    assert!(!surface.site_ready(), "site-ready withdrawn on teardown");
    assert!(driver.is_stopped());
    assert!(driver.renders() > 0);
}

#[tokio::test(flavor = "current_thread")]
async fn settled_wheel_scrolls_content() {
    let script = Script::new().wheel(12_000, 500.0).wheel(12_100, 1_000.0);
    let driver = SimDriver::new(script, Duration::from_secs(13));
    let mut runtime = Runtime::new(driver, app());
    runtime.run().await.unwrap();

    let (driver, app) = runtime.into_parts();
    assert_eq!(driver.surface().scroll_top(), 1_500.0);
    assert!(app.sections().has_scrolled());
    // Midpoint 1500 + 400 = 1900; projects spans 1880..2780
    assert_eq!(app.sections().active(), Section::Projects);
}

#[tokio::test(flavor = "current_thread")]
async fn locked_wheel_never_scrolls_content() {
    let script = Script::new().wheel(1_000, 10.0).wheel(1_100, 10.0);
    let driver = SimDriver::new(script, Duration::from_secs(3));
    let mut runtime = Runtime::new(driver, app());
    runtime.run().await.unwrap();

    let (driver, app) = runtime.into_parts();
    assert_eq!(driver.surface().scroll_top(), 0.0);
    assert_eq!(driver.surface().suppressed_scrolls(), 2);
    assert!(!app.sections().has_scrolled());
}

/// Driver whose renders fail.
#[derive(Debug, Default)]
struct BrokenScreen {
    polls: usize,
    stopped: bool,
    applied: Vec<Action>,
}

#[derive(Debug, thiserror::Error)]
#[error("screen gone")]
struct ScreenGone;

impl Driver for BrokenScreen {
    type Error = ScreenGone;

    fn poll_event(
        &mut self,
        _deadline: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send {
        self.polls += 1;
        future::ready(Ok(vec![AppEvent::ToggleTheme]))
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn track_width(&self) -> f64 {
        270.0
    }

    fn apply(&mut self, actions: &[Action], _now: Instant) {
        self.applied.extend_from_slice(actions);
    }

    fn scroll_to(&mut self, _offset: f64, _app: &App) {}

    fn scroll_by(&mut self, _delta: f64, _app: &App) {}

    fn render(&mut self, _app: &App) -> Result<(), Self::Error> {
        Err(ScreenGone)
    }

    fn persist_theme(&mut self, _theme: Theme) -> Result<(), Self::Error> {
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

#[tokio::test(flavor = "current_thread")]
async fn driver_failure_still_tears_down() {
    let mut runtime = Runtime::new(BrokenScreen::default(), app());
    let result = runtime.run().await;
    assert!(matches!(result, Err(RuntimeError::Driver(ScreenGone))));

    let (driver, _app) = runtime.into_parts();
    assert!(driver.stopped);
    assert_eq!(driver.polls, 0, "mount render fails before the first poll");
    assert!(driver.applied.contains(&Action::MountView(View::LockScreen)));
}

proptest! {
    /// With contiguous sections, the active section is the one under the
    /// viewport midpoint, and a midpoint past the end keeps the last answer.
    #[test]
    fn active_section_follows_midpoint(
        scrolls in prop::collection::vec(0.0f64..6_000.0, 1..20),
        viewport in 200.0f64..1_200.0,
    ) {
        let mut tracker = SectionTracker::stacked(80.0, 900.0);
        let mut expected = Section::About;
        for top in scrolls {
            tracker.on_scroll(top, viewport);
            let probe = top + viewport / 2.0;
            if (80.0..80.0 + 5.0 * 900.0).contains(&probe) {
                let index = ((probe - 80.0) / 900.0).floor() as usize;
                expected = Section::ALL[index];
            }
            prop_assert_eq!(tracker.active(), expected);
        }
    }
}
