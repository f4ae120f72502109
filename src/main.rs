mod app;
mod config;
mod logging;
mod ui;

use std::error::Error;
use std::io::{self, Stderr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use ratatui_image::picker::Picker;
use tracing::{error, info, warn};

use crate::app::{App, SubmitOutcome};
use crate::app::tmdb::TmdbClient;
use crate::config::Config;

type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Search The Movie Database from the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Search for this title as soon as the app starts
    query: Option<String>,

    /// TMDB API key (overrides TMDB_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Directory for the log file (overrides MOVIE_FINDER_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(api_key) = &self.api_key {
            config.api_key = api_key.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.log_dir = log_dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    cli.apply_to(&mut config);

    let log_path = logging::init_tracing(&config.log_dir)?;
    info!(log = %log_path.display(), search_url = %config.search_url, "Starting movie finder");
    if config.has_placeholder_key() {
        warn!("No TMDB API key configured, searches will be rejected");
    }

    let source = Arc::new(TmdbClient::new(&config)?);
    let mut app = App::new(source, &config);

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    app.picker = match Picker::from_query_stdio() {
        Ok(picker) => Some(picker),
        Err(e) => {
            warn!(error = ?e, "Terminal image support unavailable, posters disabled");
            None
        }
    };

    if let Some(query) = cli.query {
        app.search_term = query;
        if let SubmitOutcome::Dispatched(request_id) = app.submit_search() {
            info!(request_id, "Searching for start-up query");
        }
    }

    let result = run_app(&mut terminal, &mut app);

    restore_terminal();
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Exiting"),
        Err(e) => error!(error = %e, "Exiting after error"),
    }
    result
}

/// Enters raw mode and the alternate screen on stderr. If any step fails the
/// steps already taken are undone before the error is returned.
fn setup_terminal() -> Result<Tui, Box<dyn Error>> {
    enable_raw_mode()?;
    restore_on_error(
        || {
            let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
            execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

            let backend = CrosstermBackend::new(stderr);
            Ok(Terminal::new(backend)?)
        },
        restore_terminal,
    )
}

fn restore_on_error<T>(
    setup: impl FnOnce() -> Result<T, Box<dyn Error>>,
    restore: impl FnOnce(),
) -> Result<T, Box<dyn Error>> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stderr = io::stderr();
    let _ = execute!(stderr, LeaveAlternateScreen, DisableMouseCapture);
}

/// Puts the terminal back before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        // Apply whatever the background threads have finished
        app.poll_messages();

        // Poll for events with a timeout to allow UI updates
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle search input when the field is focused
                if app.searching {
                    match key.code {
                        KeyCode::Char(c) => {
                            app.search_term.push(c);
                        }
                        KeyCode::Backspace => {
                            app.search_term.pop();
                        }
                        KeyCode::Enter => {
                            app.submit_search();
                        }
                        KeyCode::Esc => {
                            app.searching = false;
                        }
                        _ => {}
                    }
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('/') | KeyCode::Char('s') => {
                        app.searching = true;
                    }
                    KeyCode::Char('r') => {
                        app.reload();
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        app.next_card();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        app.previous_card();
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_setup_is_rolled_back() {
        let mut restored = false;
        let result: Result<(), Box<dyn Error>> =
            restore_on_error(|| Err("no tty".into()), || restored = true);

        assert!(result.is_err());
        assert!(restored);
    }

    #[test]
    fn test_successful_setup_is_kept() {
        let mut restored = false;
        let result = restore_on_error(|| Ok(7), || restored = true);

        assert_eq!(result.unwrap(), 7);
        assert!(!restored);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "movie_finder",
            "--api-key",
            "from-cli",
            "--log-dir",
            "/tmp/mf",
            "--timeout-secs",
            "3",
            "blade runner",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(cli.query.as_deref(), Some("blade runner"));
        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/mf"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_cli_defaults_leave_config_alone() {
        let cli = Cli::parse_from(["movie_finder"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert!(cli.query.is_none());
        assert_eq!(config, Config::default());
    }
}
