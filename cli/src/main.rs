//! Stagehand CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI wires [`stagehand_core`] (sequencer, passage stack, shell) to
//! [`stagehand_tui`] (rendering), providing RAII-based terminal management
//! with guaranteed cleanup.
//!
//! ```text
//! main() -> config -> Sequencer + demo registry -> Shell -> run_app() -> TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`stagehand_tui::InputPump`])
//! 3. Advance the shell (`shell.tick()`): bootstrap gates, load completion,
//!    passage transitions
//! 4. Render frame

mod demo;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use stagehand_config::StagehandConfig;
use stagehand_core::{BootstrapTiming, Sequencer, SequencerOptions, Shell, SystemClock};
use stagehand_tui::{InputPump, draw, handle_events};
use stagehand_types::UiOptions;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

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

    // No log file: stay silent rather than write over the TUI.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
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

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.stagehand/logs/stagehand.log
    if let Some(config_path) = StagehandConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("stagehand.log"));
    }

    // Fallback: ./.stagehand/logs/stagehand.log
    candidates.push(PathBuf::from(".stagehand").join("logs").join("stagehand.log"));

    candidates
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are entered on construction and left
/// again on drop, so the terminal stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn build_shell(options: SequencerOptions) -> Shell {
    let clock = Arc::new(SystemClock);
    let timing = Arc::new(BootstrapTiming::start(clock.as_ref()));
    let loader = Arc::new(demo::loader(&options));
    let sequencer =
        Sequencer::new(options, loader, clock, timing).with_surface(demo::surface());
    Shell::new(sequencer)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = StagehandConfig::load().ok().flatten();
    let options = config
        .as_ref()
        .map(StagehandConfig::sequencer_options)
        .unwrap_or_default();
    let ui = config
        .as_ref()
        .map(StagehandConfig::ui_options)
        .unwrap_or_default();

    tracing::info!(
        module = options.main_module.as_str(),
        export = options.main_export.as_str(),
        "Starting bootstrap"
    );
    let mut shell = build_shell(options);

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut shell, ui).await
    };

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    if let Some(err) = shell.failure() {
        eprintln!("Bootstrap failed: {err}");
    }

    Ok(())
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, shell: &mut Shell, ui: UiOptions) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    shell.start();
    let mut last_frame = Instant::now();

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(shell, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        let now = Instant::now();
        shell.tick(now.saturating_duration_since(last_frame));
        last_frame = now;

        if let Err(e) = terminal.draw(|frame| draw(frame, shell, ui)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}
