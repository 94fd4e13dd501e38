//! Civic CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`civic_engine`] (session state) and [`civic_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> Settings::load() -> open_store() -> TerminalSession::new() -> run_app()
//! ```
//!
//! # Event Loop
//!
//! 1. Expire the status line
//! 2. Render frame
//! 3. Wait up to one frame for input and apply it
//! 4. Check for quit

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Instant,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use civic_config::{Settings, config_path};
use civic_engine::{App, FileStore, KeyValueStore, MemoryStore, ThreadRandom};
use civic_tui::{draw, handle_events};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_civic_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_civic_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in civic_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn civic_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.civic/logs/civic.log
    if let Some(config_path) = config_path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("civic.log"));
    }

    // Fallback: ./.civic/logs/civic.log
    candidates.push(PathBuf::from(".civic").join("logs").join("civic.log"));

    candidates
}

/// Durable store in `data_dir`, or an in-memory one when that is impossible.
fn open_store(data_dir: Option<&Path>) -> Box<dyn KeyValueStore> {
    let Some(dir) = data_dir else {
        tracing::warn!("No data directory available; progress will not be saved");
        return Box::new(MemoryStore::new());
    };
    match FileStore::open(dir) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "Using file store");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("{e}; progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            let _ = execute!(out, DisableMouseCapture, LeaveAlternateScreen);
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::load();
    let store = open_store(settings.data_dir.as_deref());
    let mut app = App::new(settings.registry, store, Box::new(ThreadRandom), settings.ui);

    let run_result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app)
    };

    if let Err(err) = run_result {
        tracing::error!("Session ended with an error: {err:?}");
        eprintln!("Error: {err:?}");
    }
    tracing::info!("Session closed");
    Ok(())
}

fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    loop {
        app.expire_status(Instant::now());
        terminal.draw(|frame| draw(frame, app))?;

        if handle_events(app)? {
            return Ok(());
        }
    }
}
