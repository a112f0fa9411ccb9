//! NU Pay signup - Terminal registration client for NU Pay Finance
//!
//! A Ratatui-based TUI that collects and validates a new account's
//! details, registers it with the NU Pay API and keeps the session.

mod app;
mod auth;
mod config;
mod controller;
mod platform;
mod session;
mod state;
mod ui;

use anyhow::Result;
use app::App;
use auth::AuthClient;
use config::Settings;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use session::FileSessionStore;
use std::fs::{self, File};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const POLL_INTERVAL: Duration = Duration::from_millis(80);

/// Log to a file under the data dir; the terminal belongs to the UI.
/// Falls back to stderr when the file can't be created.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nupay_signup=info".into());

    let log_file = Settings::log_path().and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        File::options().create(true).append(true).open(path).ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let settings = Settings::load()?;
    let api_url = settings.api_url();
    tracing::info!(api_url = %api_url, "Starting nupay-signup");

    let auth = AuthClient::new(&api_url, settings.request_timeout())?;
    let store = FileSessionStore::open(settings.session_path())?;
    if store.session().is_some() {
        tracing::info!(path = %store.path().display(), "A previous session is stored");
    }
    let mut app = App::new(Arc::new(auth), Arc::new(store));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!("Exiting after error: {err:?}");
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases as well
                if key.kind == KeyEventKind::Press {
                    // Global quit: Ctrl+C
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }

                    app.handle_key(key)?;
                }
            }
        }

        // Let the spawned submission make progress before draining it
        tokio::task::yield_now().await;
        app.poll_submissions();
        app.on_tick();

        if app.should_quit() {
            return Ok(());
        }
    }
}
