//! LeetSearch TUI - terminal popup for searching profiles by college.
//!
//! The popup talks to the search backend directly over HTTP. The backend
//! base URL comes from the preference file unless `--backend` overrides it.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use leetsearch_core::PopupController;
use leetsearch_core::backend::HttpBackend;
use leetsearch_core::config::{BACKEND_URL_KEY, ConfigStore, Directories, FileStore, MemoryStore};
use leetsearch_tui::app::{Events, Flow, handle_key, submit_query};
use leetsearch_tui::fields::InputField;
use leetsearch_tui::surface::TerminalSurface;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::io;

mod cli;

use cli::Cli;

fn setup_logging(debug_flag: bool) -> WorkerGuard {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = Directories::new()
        .ok()
        .map(|dirs| dirs.cache)
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .unwrap_or_else(std::env::temp_dir);

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("leetsearch-tui-{timestamp}.log");

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(cli.debug);

    let backend = HttpBackend::new()?;

    if let Some(url) = cli.backend.as_deref() {
        tracing::info!("Using session backend override: {}", url);
        let store = MemoryStore::with_value(BACKEND_URL_KEY, url);
        run_popup(store, backend, cli.query.as_deref()).await
    } else {
        let dirs = Directories::new()?;
        tracing::debug!("Preferences at {}", dirs.storage_file.display());
        run_popup(FileStore::new(dirs.storage_file), backend, cli.query.as_deref()).await
    }
}

async fn run_popup<S: ConfigStore>(
    store: S,
    backend: HttpBackend,
    initial_query: Option<&str>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut surface = TerminalSurface::new(terminal);
    if let Some(query) = initial_query {
        surface.fields.query = InputField::with_text(query);
    }

    let mut controller = PopupController::new(store, backend, surface);
    controller.view_mut().redraw();

    let mut events = Events::new(EventStream::new());

    let mut running = true;
    if initial_query.is_some() {
        running = submit_query(&mut controller, &mut events).await;
    }

    while running {
        let Some(event) = events.next().await else {
            break;
        };

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                running = handle_key(&mut controller, key, &mut events).await == Flow::Continue;
            }
            Event::Resize(..) => controller.view_mut().redraw(),
            _ => {}
        }
    }

    let terminal = controller.view_mut().terminal_mut();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
