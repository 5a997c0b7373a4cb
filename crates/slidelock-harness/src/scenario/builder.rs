//! Scenario builder API.
//!
//! Provides a declarative API for constructing scenario tests that enforce
//! the Oracle Pattern.

use std::{sync::mpsc, time::Duration};

use slidelock_app::{App, Runtime, SectionTracker, Theme, ThemeContext};
use slidelock_core::SequencerConfig;

use crate::{
    scenario::{OracleFn, World},
    script::Script,
    sim_driver::SimDriver,
};

/// Scenario builder.
///
/// Configure the page and script the user, then call `.oracle()` to get a
/// [`RunnableScenario`] that can be executed.
pub struct Scenario {
    name: String,
    config: SequencerConfig,
    script: Script,
    horizon: Duration,
    track_width: f64,
    viewport: (f64, f64),
    stored_theme: Option<Theme>,
    system_theme: Option<Theme>,
    sections: SectionTracker,
}

impl Scenario {
    /// Create a new scenario with the given name.
    ///
    /// Defaults: default config, no input, 30 s of virtual time, a 270 unit
    /// slide track, a 1280x800 viewport.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: SequencerConfig::default(),
            script: Script::new(),
            horizon: Duration::from_secs(30),
            track_width: 270.0,
            viewport: (1280.0, 800.0),
            stored_theme: None,
            system_theme: None,
            sections: SectionTracker::stacked(80.0, 900.0),
        }
    }

    /// Use a custom sequencer configuration.
    pub fn config(mut self, config: SequencerConfig) -> Self {
        self.config = config;
        self
    }

    /// Scripted input.
    pub fn script(mut self, script: Script) -> Self {
        self.script = script;
        self
    }

    /// End the run after `horizon` of virtual time.
    pub fn run_for(mut self, horizon: Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// Measured slide-track width.
    pub fn track_width(mut self, width: f64) -> Self {
        self.track_width = width;
        self
    }

    /// Viewport size.
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Theme found in the store at start.
    pub fn stored_theme(mut self, theme: Theme) -> Self {
        self.stored_theme = Some(theme);
        self
    }

    /// System colour-scheme preference at start.
    pub fn system_theme(mut self, theme: Theme) -> Self {
        self.system_theme = Some(theme);
        self
    }

    /// Destination section layout.
    pub fn sections(mut self, sections: SectionTracker) -> Self {
        self.sections = sections;
        self
    }

    /// Set the oracle function and return a runnable scenario.
    ///
    /// The oracle is mandatory - you cannot run a scenario without
    /// verification.
    pub fn oracle(self, oracle: OracleFn) -> RunnableScenario {
        RunnableScenario { scenario: self, oracle }
    }
}

/// A scenario with an oracle function that can be executed.
pub struct RunnableScenario {
    scenario: Scenario,
    oracle: OracleFn,
}

impl RunnableScenario {
    /// Execute the scenario.
    ///
    /// Runs the production [`Runtime`] on a current-thread executor with a
    /// [`SimDriver`] until the script quits or the horizon passes, then
    /// invokes the oracle on the resulting [`World`].
    pub fn run(self) -> Result<(), String> {
        let Scenario {
            name,
            config,
            script,
            horizon,
            track_width,
            viewport,
            stored_theme,
            system_theme,
            sections,
        } = self.scenario;

        let theme = ThemeContext::init(stored_theme, system_theme);
        let mut app = App::new(config, theme, sections)
            .map_err(|e| format!("Scenario '{name}': invalid config: {e}"))?;

        let (tx, rx) = mpsc::channel();
        app.signals_mut().subscribe(move |signal| {
            // Receiver outlives the run.
            let _ = tx.send(signal.clone());
        });

        let driver = SimDriver::new(script, horizon)
            .with_track_width(track_width)
            .with_viewport(viewport.0, viewport.1);
        let mut runtime = Runtime::new(driver, app);

        let executor = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| format!("Scenario '{name}': executor: {e}"))?;
        executor
            .block_on(runtime.run())
            .map_err(|e| format!("Scenario '{name}': runtime failed: {e}"))?;

        let (driver, app) = runtime.into_parts();
        let world = World {
            name,
            trace: driver.trace().to_vec(),
            surface: driver.surface().clone(),
            view: app.view(),
            snapshot: app.snapshot(),
            deadline_pending: app.next_deadline().is_some(),
            persisted: driver.persisted().to_vec(),
            signals: rx.try_iter().collect(),
            renders: driver.renders(),
            stopped: driver.is_stopped(),
            elapsed: driver.clock().elapsed(),
        };

        (self.oracle)(&world)
    }
}
