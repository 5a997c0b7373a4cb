//! Terminal driver.
//!
//! Implements [`Driver`] over crossterm input and a ratatui terminal. The
//! driver owns a reference [`Surface`]: surface actions are applied to it,
//! every draw samples it, and its animation completions are reported back
//! as input. While anything is moving the driver also wakes at a fixed
//! frame interval and redraws the last captured [`Scene`].

use std::{
    future::Future,
    io::{self, Stdout},
    time::{Duration, Instant},
};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use slidelock_app::{App, AppEvent, Driver, Surface, Theme, ThemeStore};
use slidelock_core::{Action, InputEvent};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    input::InputState,
    ui::{self, CELL_HEIGHT, CELL_WIDTH, Hints, Scene},
};

/// Redraw cadence while animations run.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Terminal driver failures.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Terminal I/O failed.
    #[error("terminal I/O: {0}")]
    Io(#[from] io::Error),

    /// The input stream ended.
    #[error("terminal input closed")]
    InputClosed,

    /// The theme store failed.
    #[error("theme store: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

enum Wake {
    Input(Option<io::Result<Event>>),
    Timer,
}

/// Production driver for a crossterm terminal.
pub struct TerminalDriver<S> {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    input: InputState,
    surface: Surface,
    store: S,
    scene: Option<Scene>,
    hints: Hints,
    queued: Vec<AppEvent>,
    mouse: bool,
    restored: bool,
}

impl<S> std::fmt::Debug for TerminalDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDriver")
            .field("surface", &self.surface)
            .field("hints", &self.hints)
            .field("mouse", &self.mouse)
            .finish_non_exhaustive()
    }
}

impl<S: ThemeStore> TerminalDriver<S> {
    /// Take over the terminal: raw mode, alternate screen and, if `mouse`,
    /// mouse capture.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be set up. Whatever was
    /// already switched on is switched off again.
    pub fn new(store: S, mouse: bool) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let setup = || -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            if mouse {
                execute!(stdout, EnableMouseCapture)?;
            }
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
            terminal.hide_cursor()?;
            Ok(terminal)
        };
        let mut terminal = match setup() {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e.into());
            },
        };

        let size = terminal.size()?;
        terminal.clear()?;
        let surface =
            Surface::new(f64::from(size.width) * CELL_WIDTH, f64::from(size.height) * CELL_HEIGHT);
        debug!(cols = size.width, rows = size.height, mouse, "terminal driver ready");

        Ok(Self {
            terminal,
            events: EventStream::new(),
            input: InputState::new(mouse),
            surface,
            store,
            scene: None,
            hints: Hints::default(),
            queued: Vec::new(),
            mouse,
            restored: false,
        })
    }

    fn next_wake(&self, deadline: Option<Instant>, now: Instant) -> Option<Instant> {
        let frame = self.surface.is_animating(now).then(|| now + FRAME_INTERVAL);
        [deadline, self.surface.next_completion(), frame].into_iter().flatten().min()
    }

    fn draw(&mut self, now: Instant) -> Result<(), TerminalError> {
        let Some(scene) = &self.scene else {
            return Ok(());
        };
        let surface = &self.surface;
        let mut hints = Hints::default();
        self.terminal.draw(|frame| {
            hints = ui::draw(frame, scene, surface, now);
        })?;
        self.hints = hints;
        Ok(())
    }

    fn map_input(&mut self, event: &Event, now: Instant) -> Vec<AppEvent> {
        let events = self.input.map(event, &self.hints, self.surface.handle_x(now));
        for event in &events {
            if let AppEvent::Resize { width, height } = *event {
                self.surface.resize(width, height);
            }
        }
        events
    }

    fn queue_scroll(&mut self, top: Option<f64>) {
        if let Some(scroll_top) = top {
            let (_, viewport_height) = self.surface.viewport();
            self.queued.push(AppEvent::ContentScrolled { scroll_top, viewport_height });
        }
    }

    fn max_scroll(&self, app: &App) -> f64 {
        app.sections().content_height() - self.surface.viewport().1
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        if self.mouse {
            execute!(self.terminal.backend_mut(), DisableMouseCapture)?;
        }
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        self.terminal.show_cursor()
    }
}

impl<S> Driver for TerminalDriver<S>
where
    S: ThemeStore + Send,
{
    type Error = TerminalError;

    fn poll_event(
        &mut self,
        deadline: Option<Instant>,
    ) -> impl Future<Output = Result<Vec<AppEvent>, Self::Error>> + Send {
        async move {
            if !self.queued.is_empty() {
                return Ok(std::mem::take(&mut self.queued));
            }

            let wake = self.next_wake(deadline, Instant::now());
            let sleep = async move {
                match wake {
                    Some(at) => tokio::time::sleep_until(at.into()).await,
                    None => std::future::pending::<()>().await,
                }
            };
            let woke = tokio::select! {
                event = self.events.next() => Wake::Input(event),
                () = sleep => Wake::Timer,
            };

            let now = Instant::now();
            let mut events: Vec<AppEvent> = self
                .surface
                .take_completions(now)
                .into_iter()
                .map(|id| AppEvent::Input(InputEvent::AnimationComplete(id)))
                .collect();
            match woke {
                Wake::Input(Some(event)) => {
                    let event = event?;
                    trace!(?event, "terminal event");
                    events.extend(self.map_input(&event, now));
                },
                Wake::Input(None) => return Err(TerminalError::InputClosed),
                Wake::Timer => {
                    if events.is_empty() && self.surface.is_animating(now) {
                        self.draw(now)?;
                    }
                },
            }
            Ok(events)
        }
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn track_width(&self) -> f64 {
        ui::track_width(self.surface.viewport().0)
    }

    fn apply(&mut self, actions: &[Action], now: Instant) {
        self.surface.apply_all(actions, now);
    }

    fn scroll_to(&mut self, offset: f64, app: &App) {
        let max = self.max_scroll(app);
        let top = self.surface.scroll_to(offset, max);
        self.queue_scroll(top);
    }

    fn scroll_by(&mut self, delta: f64, app: &App) {
        let max = self.max_scroll(app);
        let top = self.surface.scroll_to(self.surface.scroll_top() + delta, max);
        self.queue_scroll(top);
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.scene = Some(Scene::capture(app));
        self.draw(Instant::now())
    }

    fn persist_theme(&mut self, theme: Theme) -> Result<(), Self::Error> {
        self.store.save(theme).map_err(|e| TerminalError::Store(Box::new(e)))
    }

    fn stop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

impl<S> Drop for TerminalDriver<S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        let _ = execute!(self.terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
