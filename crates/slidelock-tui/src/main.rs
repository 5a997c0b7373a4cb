//! Slidelock terminal binary.
//!
//! Parses flags, opens the theme store, takes over the terminal and runs
//! the page until the user quits. Logs go to a file; stdout belongs to the
//! UI.

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use slidelock_app::{SectionTracker, Theme, ThemeContext, ThemeStore};
use slidelock_core::SequencerConfig;
use slidelock_tui::{
    App, RedbThemeStore, Runtime, TerminalDriver,
    ui::{HEADER_HEIGHT, SECTION_HEIGHT},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Slide-to-unlock portfolio in the terminal.
#[derive(Debug, Parser)]
#[command(name = "slidelock", version, about)]
struct Args {
    /// Seconds without input before the page unlocks by itself.
    #[arg(long, default_value_t = 10.0)]
    idle_secs: f64,

    /// Fraction of the track the handle must pass to unlock.
    #[arg(long, default_value_t = 0.7)]
    commit_ratio: f64,

    /// Scale applied to wheel deltas before they move the handle.
    #[arg(long, default_value_t = 0.5)]
    scroll_damping: f64,

    /// Theme preference database.
    #[arg(long, default_value = "slidelock.redb")]
    store: PathBuf,

    /// Log file.
    #[arg(long, default_value = "slidelock.log")]
    log_file: PathBuf,

    /// Theme of the host terminal, used until a theme is chosen.
    #[arg(long)]
    system_theme: Option<Theme>,

    /// Disable mouse capture; keys only.
    #[arg(long)]
    no_mouse: bool,
}

impl Args {
    fn sequencer_config(&self) -> Result<SequencerConfig, Box<dyn std::error::Error>> {
        let mut config = SequencerConfig::default();
        config.gesture.idle_delay = Duration::try_from_secs_f64(self.idle_secs)?;
        config.gesture.commit_ratio = self.commit_ratio;
        config.gesture.scroll_damping = self.scroll_damping;
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(Mutex::new(file)).with_ansi(false).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = args.sequencer_config()?;

    let store = RedbThemeStore::open(&args.store)?;
    let stored = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring stored theme");
        None
    });
    let theme = ThemeContext::init(stored, args.system_theme);
    info!(theme = %theme.theme(), explicit = theme.is_explicit(), "starting");

    let app = App::new(config, theme, SectionTracker::stacked(HEADER_HEIGHT, SECTION_HEIGHT))?;
    let driver = TerminalDriver::new(store, !args.no_mouse)?;
    Runtime::new(driver, app).run().await?;

    info!("bye");
    Ok(())
}
