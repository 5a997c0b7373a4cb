//! Page composition state machine.
//!
//! [`App`] owns the unlock sequencer and the page-level state around it
//! (theme, section tracking, signals) and decides what the page shows:
//! the lock screen until the unlock edge, the destination afterwards,
//! scroll-locked until the expansion settles, with the dock appearing once
//! the site is ready.
//!
//! Like the core machines it performs no I/O. Every method returns
//! [`AppAction`]s for the runtime to execute.

use std::time::Instant;

use slidelock_core::{
    Action, ConfigError, ExpansionPhase, InputEvent, SequencerConfig, SequencerError,
    SequencerSnapshot, UnlockSequencer,
};
use tracing::{debug, trace};

use crate::{
    action::AppAction,
    event::AppEvent,
    sections::{Section, SectionTracker},
    signal::{Signal, SignalBus},
    theme::{Theme, ThemeContext},
};

/// Which top-level view the page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Phone lock screen.
    LockScreen,
    /// Expanding or settled website.
    Destination,
}

/// Everything a renderer needs besides the surface's animated values.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Top-level view.
    pub screen: Screen,
    /// Expansion phase.
    pub phase: ExpansionPhase,
    /// Destination content may not scroll yet.
    pub scroll_locked: bool,
    /// Dock shown (site ready).
    pub dock_visible: bool,
    /// Dock raised after the first scroll.
    pub dock_raised: bool,
    /// Section under the viewport midpoint.
    pub active_section: Section,
    /// Current theme.
    pub theme: Theme,
    /// Project most recently focused from a skill chip.
    pub focused_project: Option<String>,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    sequencer: UnlockSequencer,
    theme: ThemeContext,
    sections: SectionTracker,
    signals: SignalBus,
    focused_project: Option<String>,
}

impl App {
    /// Build the page around a validated sequencer configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        config: SequencerConfig,
        theme: ThemeContext,
        sections: SectionTracker,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            sequencer: UnlockSequencer::new(config)?,
            theme,
            sections,
            signals: SignalBus::new(),
            focused_project: None,
        })
    }

    /// Mount the lock screen.
    ///
    /// # Errors
    ///
    /// Returns an error on a second mount or after shutdown.
    pub fn mount(&mut self, track_width: f64, now: Instant) -> Result<Vec<AppAction>, SequencerError> {
        let actions = self.sequencer.mount(track_width, now)?;
        Ok(self.surface(actions))
    }

    /// Tear the page down. Nothing fires afterwards.
    pub fn shutdown(&mut self) -> Vec<AppAction> {
        let actions = self.sequencer.unmount();
        let out = self.surface(actions);
        self.signals.clear();
        out
    }

    /// Process one event.
    pub fn handle(&mut self, event: AppEvent, now: Instant) -> Vec<AppAction> {
        match event {
            AppEvent::Input(input) => self.handle_input(input, now),
            AppEvent::ToggleTheme => {
                let theme = self.theme.toggle();
                self.signals.publish(&Signal::ThemeChanged(theme));
                vec![AppAction::PersistTheme(theme), AppAction::Render]
            },
            AppEvent::SetTheme(theme) => {
                let mut actions = vec![AppAction::PersistTheme(theme)];
                if self.theme.set(theme) {
                    self.signals.publish(&Signal::ThemeChanged(theme));
                    actions.push(AppAction::Render);
                }
                actions
            },
            AppEvent::SystemThemeChanged(theme) => {
                if !self.theme.system_changed(theme) {
                    return Vec::new();
                }
                self.signals.publish(&Signal::ThemeChanged(theme));
                vec![AppAction::Render]
            },
            AppEvent::ContentScrolled { scroll_top, viewport_height } => {
                self.on_content_scrolled(scroll_top, viewport_height)
            },
            AppEvent::JumpToSection(section) => self.jump_to(section),
            AppEvent::FocusProject(link) => {
                if !self.signals.focus_project(&link) {
                    trace!(%link, "placeholder project link");
                    return Vec::new();
                }
                self.focused_project = Some(link);
                let mut actions = self.jump_to(Section::Projects);
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::Resize { .. } => vec![AppAction::Render],
            AppEvent::Quit => vec![AppAction::Quit],
        }
    }

    /// Fire due deadlines.
    pub fn tick(&mut self, now: Instant) -> Vec<AppAction> {
        let actions = self.sequencer.tick(now);
        self.surface(actions)
    }

    /// When [`Self::tick`] next has work.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.sequencer.next_deadline()
    }

    /// Sequencer state.
    pub fn snapshot(&self) -> SequencerSnapshot {
        self.sequencer.snapshot()
    }

    /// Page-level view for rendering.
    pub fn view(&self) -> PageView {
        let snap = self.sequencer.snapshot();
        PageView {
            screen: if snap.unlocked() { Screen::Destination } else { Screen::LockScreen },
            phase: snap.phase,
            scroll_locked: !snap.content_scrollable,
            dock_visible: snap.site_ready,
            dock_raised: snap.site_ready && self.sections.has_scrolled(),
            active_section: self.sections.active(),
            theme: self.theme.theme(),
            focused_project: self.focused_project.clone(),
        }
    }

    /// Theme context.
    pub fn theme(&self) -> &ThemeContext {
        &self.theme
    }

    /// Theme context, for subscribing.
    pub fn theme_mut(&mut self) -> &mut ThemeContext {
        &mut self.theme
    }

    /// Section tracker.
    pub fn sections(&self) -> &SectionTracker {
        &self.sections
    }

    /// Section tracker, for relayout.
    pub fn sections_mut(&mut self) -> &mut SectionTracker {
        &mut self.sections
    }

    /// Signal bus, for subscribing.
    pub fn signals_mut(&mut self) -> &mut SignalBus {
        &mut self.signals
    }

    fn handle_input(&mut self, input: InputEvent, now: Instant) -> Vec<AppAction> {
        let actions = self.sequencer.handle(input, now);
        let prevented = actions.contains(&Action::PreventDefaultScroll);
        let mut out = self.surface(actions);

        // Default scrolling only once the content is unlocked and settled.
        if let InputEvent::Wheel { delta_y } = input {
            if !prevented && self.sequencer.snapshot().content_scrollable {
                out.push(AppAction::ScrollContentBy { delta: delta_y });
            }
        }
        out
    }

    fn on_content_scrolled(&mut self, scroll_top: f64, viewport_height: f64) -> Vec<AppAction> {
        if !self.sequencer.snapshot().content_scrollable {
            trace!(scroll_top, "ignoring scroll while content is locked");
            return Vec::new();
        }
        let update = self.sections.on_scroll(scroll_top, viewport_height);
        if let Some(section) = update.activated {
            debug!(%section, "active section");
        }
        if update.activated.is_some() || update.first_scroll {
            vec![AppAction::Render]
        } else {
            Vec::new()
        }
    }

    fn jump_to(&mut self, section: Section) -> Vec<AppAction> {
        if !self.sequencer.snapshot().content_scrollable {
            return Vec::new();
        }
        self.sections
            .offset_of(section)
            .map(|offset| vec![AppAction::ScrollContentTo { offset }])
            .unwrap_or_default()
    }

    fn surface(&mut self, actions: Vec<Action>) -> Vec<AppAction> {
        if actions.is_empty() {
            return Vec::new();
        }
        for action in &actions {
            if let Action::SiteReady(ready) = action {
                self.signals.publish(&Signal::SiteReady(*ready));
            }
        }
        vec![AppAction::Surface(actions), AppAction::Render]
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use slidelock_core::AnimationId;

    use super::*;

    fn app() -> App {
        App::new(
            SequencerConfig::default(),
            ThemeContext::default(),
            SectionTracker::stacked(0.0, 1_000.0),
        )
        .unwrap()
    }

    fn surface_actions(out: &[AppAction]) -> Vec<Action> {
        out.iter()
            .filter_map(|a| match a {
                AppAction::Surface(actions) => Some(actions.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn ids(out: &[AppAction]) -> Vec<AnimationId> {
        surface_actions(out).iter().filter_map(Action::animation_id).collect()
    }

    /// Drive the page from mount to a ready site by idle unlock.
    fn settled(t0: Instant) -> App {
        let mut app = app();
        app.mount(270.0, t0).unwrap();
        let mut now = t0 + Duration::from_secs(10);
        let mut pending = ids(&app.tick(now));
        for _ in 0..4 {
            now += Duration::from_secs(1);
            for id in std::mem::take(&mut pending) {
                pending.extend(ids(&app.handle(AppEvent::Input(InputEvent::AnimationComplete(id)), now)));
            }
            pending.extend(ids(&app.tick(now)));
        }
        app
    }

    #[test]
    fn lock_screen_until_unlocked() {
        let t0 = Instant::now();
        let mut app = app();
        let out = app.mount(270.0, t0).unwrap();
        assert!(out.contains(&AppAction::Render));

        let view = app.view();
        assert_eq!(view.screen, Screen::LockScreen);
        assert!(view.scroll_locked);
        assert!(!view.dock_visible);
    }

    #[test]
    fn settled_page_scrolls_and_shows_dock() {
        let t0 = Instant::now();
        let mut app = settled(t0);
        let view = app.view();
        assert_eq!(view.screen, Screen::Destination);
        assert_eq!(view.phase, ExpansionPhase::ContentSettled);
        assert!(!view.scroll_locked);
        assert!(view.dock_visible);
        assert!(!view.dock_raised);

        let out = app.handle(AppEvent::Input(InputEvent::Wheel { delta_y: 120.0 }), t0);
        assert_eq!(out, vec![AppAction::ScrollContentBy { delta: 120.0 }]);

        let out =
            app.handle(AppEvent::ContentScrolled { scroll_top: 800.0, viewport_height: 600.0 }, t0);
        assert_eq!(out, vec![AppAction::Render]);
        assert_eq!(app.view().active_section, Section::Skills);
        assert!(app.view().dock_raised);
    }

    #[test]
    fn wheel_on_lock_screen_never_scrolls_content() {
        let t0 = Instant::now();
        let mut app = app();
        app.mount(270.0, t0).unwrap();
        let out = app.handle(AppEvent::Input(InputEvent::Wheel { delta_y: 40.0 }), t0);
        assert!(!out.iter().any(|a| matches!(a, AppAction::ScrollContentBy { .. })));
        assert!(surface_actions(&out).contains(&Action::PreventDefaultScroll));
    }

    #[test]
    fn scroll_events_ignored_while_locked() {
        let t0 = Instant::now();
        let mut app = app();
        app.mount(270.0, t0).unwrap();
        let out =
            app.handle(AppEvent::ContentScrolled { scroll_top: 3_000.0, viewport_height: 600.0 }, t0);
        assert!(out.is_empty());
        assert_eq!(app.view().active_section, Section::About);
        assert!(app.handle(AppEvent::JumpToSection(Section::Contact), t0).is_empty());
    }

    #[test]
    fn header_link_jumps_to_section_top() {
        let t0 = Instant::now();
        let mut app = settled(t0);
        assert_eq!(
            app.handle(AppEvent::JumpToSection(Section::Leadership), t0),
            vec![AppAction::ScrollContentTo { offset: 3_000.0 }]
        );
    }

    #[test]
    fn theme_toggle_persists_and_publishes() {
        let t0 = Instant::now();
        let mut app = app();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.signals_mut().subscribe(move |s| sink.lock().unwrap().push(s.clone()));

        let out = app.handle(AppEvent::ToggleTheme, t0);
        assert_eq!(out, vec![AppAction::PersistTheme(Theme::Dark), AppAction::Render]);
        assert!(app.handle(AppEvent::SystemThemeChanged(Theme::Light), t0).is_empty());
        assert_eq!(app.view().theme, Theme::Dark);
        assert_eq!(*seen.lock().unwrap(), vec![Signal::ThemeChanged(Theme::Dark)]);
    }

    #[test]
    fn placeholder_project_focus_is_ignored() {
        let t0 = Instant::now();
        let mut app = settled(t0);
        assert!(app.handle(AppEvent::FocusProject("#".into()), t0).is_empty());

        let out = app.handle(AppEvent::FocusProject("Sandbox".into()), t0);
        assert_eq!(out[0], AppAction::ScrollContentTo { offset: 2_000.0 });
        assert_eq!(app.view().focused_project.as_deref(), Some("Sandbox"));
    }

    #[test]
    fn shutdown_withdraws_site_ready_signal() {
        let t0 = Instant::now();
        let mut app = settled(t0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        app.signals_mut().subscribe(move |s| sink.lock().unwrap().push(s.clone()));

        let out = app.shutdown();
        assert_eq!(surface_actions(&out), vec![Action::SiteReady(false)]);
        assert_eq!(*seen.lock().unwrap(), vec![Signal::SiteReady(false)]);
        assert!(app.tick(t0 + Duration::from_secs(100)).is_empty());
    }
}
