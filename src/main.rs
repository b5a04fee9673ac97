//! GalleryView - terminal edit mode for an art gallery server

use std::fs::{self, File};
use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use galleryview::api::{GalleryApi, HttpGalleryApi, Notifier, RemoteItem, Severity};
use galleryview::app::{exit_code, run_app, Config};
use galleryview::core::{GalleryState, ModeController};
use galleryview::handler::action::upload_files;

/// Environment variable holding the log filter
const LOG_ENV: &str = "GALLERYVIEW_LOG";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some((log_path, file)) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::debug!(path = %log_path.display(), "Logging initialized");
        return;
    }

    // No log file: stay silent rather than draw over the TUI
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<(PathBuf, File)> {
    let dir = dirs::data_dir()?.join("galleryview");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("galleryview.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((path, file))
}

/// Prints notifications for the non-interactive modes
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        eprintln!("[{}] {}", severity.label(), message);
    }
}

fn main() -> ExitCode {
    // Parse config first to return INVALID exit code for argument errors
    let config = match Config::from_args() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(exit_code::INVALID as u8);
        }
    };

    init_tracing();

    // Handle non-interactive modes first
    if config.status_mode {
        return run_status_mode(&config);
    }

    if !config.upload_paths.is_empty() {
        return run_upload_mode(&config);
    }

    match run_with_config(config) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

/// Print gallery stats as JSON (non-interactive)
fn run_status_mode(config: &Config) -> ExitCode {
    let result = (|| -> anyhow::Result<String> {
        let runtime = Runtime::new()?;
        let api = HttpGalleryApi::new(&config.server_url, config.timeout)?;
        let remote = runtime.block_on(api.list_items())?;
        let items = remote.into_iter().map(RemoteItem::into_item).collect();
        let state = GalleryState::new(items, &config.floating_controls);
        Ok(serde_json::to_string_pretty(&state.stats())?)
    })();

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(exit_code::SUCCESS as u8)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

/// Upload files and exit (non-interactive)
fn run_upload_mode(config: &Config) -> ExitCode {
    let result = (|| -> anyhow::Result<bool> {
        let runtime = Runtime::new()?;
        let api = HttpGalleryApi::new(&config.server_url, config.timeout)?;
        let state = GalleryState::new(Vec::new(), &config.floating_controls);
        let mut controller = ModeController::new(state).with_notifier(Arc::new(StderrNotifier));

        let report = runtime.block_on(upload_files(
            &mut controller,
            &api,
            &config.upload_paths,
            config.max_upload_bytes,
        ));
        Ok(report.uploads.total() > 0 && report.uploads.is_complete_success())
    })();

    match result {
        Ok(true) => ExitCode::from(exit_code::SUCCESS as u8),
        Ok(false) => ExitCode::from(exit_code::ERROR as u8),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_code::ERROR as u8)
        }
    }
}

fn run_with_config(config: Config) -> anyhow::Result<()> {
    // Initialize terminal
    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    result
}
