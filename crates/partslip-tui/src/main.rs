//! partslip - turn a meeting schedule sheet into per-person assignment slips.
//!
//! Starts a keyboard-driven TUI by default. `--print` and `--file` run the
//! pipeline once and write the messages to stdout.

mod app;
mod cli;
mod clipboard;
mod config;
mod ui;
mod utils;

use std::io::{self, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use partslip_core::{load_bytes, RenderedMessage, SheetClient, SheetSource};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use cli::{Cli, Command, Input};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written while the TUI owns the terminal
const LOG_FILE: &str = "partslip.log";

/// Printed when a sheet parses but yields no assignments
const NO_ASSIGNMENTS: &str = "No assignments found. Please check your sheet format.";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug). The TUI owns
/// stderr's terminal, so in that mode logs go to a file in the cache dir.
fn init_tracing(log_to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = if log_to_file { Config::log_dir().ok() } else { None };
    let log_dir = log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None if log_to_file => {
            // No writable log location; stay quiet rather than corrupt the screen
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::sink))
                .with(filter)
                .init();
            None
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    match Cli::parse().into_command() {
        Command::Print { input, json } => {
            let _guard = init_tracing(false);
            print_messages(input, json).await
        }
        Command::Tui => {
            let _guard = init_tracing(true);
            run_tui().await
        }
    }
}

// ============================================================================
// One-shot mode
// ============================================================================

async fn print_messages(input: Input, json: bool) -> Result<()> {
    let config = Config::load()?;
    let options = config.load_options();

    let schedule = match input {
        Input::File(path) => {
            let bytes = if path.as_os_str() == "-" {
                let mut buf = Vec::new();
                io::stdin().read_to_end(&mut buf)?;
                buf
            } else {
                std::fs::read(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
            };
            load_bytes(&bytes, &options).map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
        Input::Url(url) => {
            let url = url
                .or_else(|| config.initial_sheet_url())
                .ok_or_else(|| anyhow::anyhow!("No sheet URL given and none saved"))?;
            let source = SheetSource::parse(&url).map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let client = SheetClient::new(config.request_timeout())?;
            client
                .load(&source, &options)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?
        }
    };

    let messages = config.renderer().render_all(&schedule.records);
    info!(count = messages.len(), "Printing messages");

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
    } else if messages.is_empty() {
        println!("{}", NO_ASSIGNMENTS);
    } else {
        print!("{}", format_plain(&messages));
    }
    Ok(())
}

fn format_plain(messages: &[RenderedMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("=== {} ===\n{}\n", m.title, m.body))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// TUI mode
// ============================================================================

async fn run_tui() -> Result<()> {
    info!("partslip starting");

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if app.url_input.is_empty() {
        app.start_url_entry();
    } else {
        app.reload();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("partslip shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Clipboard writes go straight to the terminal, outside ratatui's buffer
        if let Some(text) = app.take_pending_copy() {
            clipboard::copy_to_clipboard(terminal.backend_mut(), &text)?;
        }

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
                Event::Paste(text) if app.state == AppState::EnteringUrl => {
                    app.paste_url(&text);
                }
                _ => {}
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
