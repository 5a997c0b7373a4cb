//! Generic orchestration loop.
//!
//! ```text
//! ┌────────┐ AppEvent  ┌─────┐ AppAction ┌─────────┐
//! │ Driver │──────────>│ App │──────────>│ Runtime │──> Driver::apply / render / persist
//! └────────┘           └─────┘           └─────────┘
//!     ^                                        │
//!     └──────── poll until next deadline ──────┘
//! ```
//!
//! The runtime mounts the page, then alternates between waiting on the
//! driver and feeding the app. On quit (or driver error) it always tears
//! the sequencer down, so no timer outlives the page.

use slidelock_core::SequencerError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{App, AppAction, Driver};

/// Runtime failure.
#[derive(Debug, Error)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// Driver I/O failed.
    #[error("driver: {0}")]
    Driver(#[source] E),

    /// Sequencer lifecycle misuse.
    #[error(transparent)]
    Sequencer(#[from] SequencerError),
}

/// Drives an [`App`] with a [`Driver`].
#[derive(Debug)]
pub struct Runtime<D: Driver> {
    driver: D,
    app: App,
}

impl<D: Driver> Runtime<D> {
    /// Pair a driver with an app.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// App state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Split back into parts.
    pub fn into_parts(self) -> (D, App) {
        (self.driver, self.app)
    }

    /// Run until the app quits.
    ///
    /// # Errors
    ///
    /// Returns the first driver error, after tearing the page down.
    pub async fn run(&mut self) -> Result<(), RuntimeError<D::Error>> {
        let now = self.driver.now();
        let actions = self.app.mount(self.driver.track_width(), now)?;
        info!("page mounted");

        let result = match self.execute(actions) {
            Ok(true) => Ok(()),
            Ok(false) => self.event_loop().await,
            Err(e) => Err(e),
        };

        let teardown = self.app.shutdown();
        if let Err(e) = self.execute(teardown) {
            warn!(error = %e, "teardown effects failed");
        }
        self.driver.stop();
        debug!("runtime stopped");
        result
    }

    async fn event_loop(&mut self) -> Result<(), RuntimeError<D::Error>> {
        loop {
            let deadline = self.app.next_deadline();
            let events = self.driver.poll_event(deadline).await.map_err(RuntimeError::Driver)?;

            let now = self.driver.now();
            let mut actions = self.app.tick(now);
            for event in events {
                actions.extend(self.app.handle(event, now));
            }

            if self.execute(actions)? {
                return Ok(());
            }
        }
    }

    /// Execute actions; returns `true` on quit. Renders at most once.
    fn execute(&mut self, actions: Vec<AppAction>) -> Result<bool, RuntimeError<D::Error>> {
        let now = self.driver.now();
        let mut render = false;
        let mut quit = false;

        for action in actions {
            match action {
                AppAction::Surface(effects) => self.driver.apply(&effects, now),
                AppAction::Render => render = true,
                AppAction::Quit => quit = true,
                AppAction::PersistTheme(theme) => {
                    // A failed save only loses the preference.
                    if let Err(e) = self.driver.persist_theme(theme) {
                        warn!(error = %e, %theme, "failed to persist theme");
                    }
                },
                AppAction::ScrollContentTo { offset } => self.driver.scroll_to(offset, &self.app),
                AppAction::ScrollContentBy { delta } => self.driver.scroll_by(delta, &self.app),
            }
        }

        if render && !quit {
            self.driver.render(&self.app).map_err(RuntimeError::Driver)?;
        }
        Ok(quit)
    }
}
