//! Application configuration from CLI arguments

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::config_file::ConfigFile;
use crate::core::ChromeElement;
use crate::scheduler::SchedulerConfig;

/// Process exit codes
pub mod exit_code {
    /// Normal exit
    pub const SUCCESS: i32 = 0;
    /// Runtime failure (server unreachable, upload failed, ...)
    pub const ERROR: i32 = 1;
    /// Invalid command-line arguments
    pub const INVALID: i32 = 2;
}

/// Application configuration from CLI args and config file
#[derive(Debug, Clone)]
pub struct Config {
    /// Gallery server base URL
    pub server_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Explicit config file (--config)
    pub config_path: Option<PathBuf>,
    /// Files to upload without starting the UI
    pub upload_paths: Vec<PathBuf>,
    /// Print stats as JSON and exit
    pub status_mode: bool,
    /// Animation scheduler settings
    pub scheduler: SchedulerConfig,
    /// Rows reserved for mode headers
    pub header_rows: u16,
    /// Floating controls shown in Normal mode
    pub floating_controls: Vec<ChromeElement>,
    /// Largest accepted upload
    pub max_upload_bytes: u64,
}

impl Config {
    pub fn from_args() -> anyhow::Result<Self> {
        Self::parse(env::args().skip(1))
    }

    /// Parse arguments (without the program name)
    pub fn parse<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter().peekable();
        let mut server_url: Option<String> = None;
        let mut config_path: Option<PathBuf> = None;
        let mut upload_paths: Vec<PathBuf> = Vec::new();
        let mut status_mode = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" | "-s" => {
                    let Some(url) = args.next() else {
                        anyhow::bail!("--server requires a URL");
                    };
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("--server expects an http(s) URL, got '{}'", url);
                    }
                    server_url = Some(url);
                }
                "--config" | "-c" => {
                    let Some(path) = args.next() else {
                        anyhow::bail!("--config requires a file path");
                    };
                    config_path = Some(PathBuf::from(path));
                }
                "--upload" | "-u" => {
                    while let Some(next) = args.next_if(|a| !a.starts_with('-')) {
                        upload_paths.push(PathBuf::from(next));
                    }
                    if upload_paths.is_empty() {
                        anyhow::bail!("--upload requires at least one file");
                    }
                }
                "--status" => status_mode = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(exit_code::SUCCESS);
                }
                "--version" | "-V" => {
                    println!("gv {}", env!("CARGO_PKG_VERSION"));
                    std::process::exit(exit_code::SUCCESS);
                }
                unknown => {
                    anyhow::bail!(
                        "Unknown option: {}. Use --help for usage information.",
                        unknown
                    );
                }
            }
        }

        let config_file = match &config_path {
            Some(path) => ConfigFile::load_from(path)
                .map_err(|e| anyhow::anyhow!("Cannot load {}: {}", path.display(), e))?,
            None => ConfigFile::load(),
        };

        Ok(Self {
            server_url: server_url.unwrap_or(config_file.server.base_url),
            timeout: Duration::from_secs(config_file.server.timeout_secs),
            config_path,
            upload_paths,
            status_mode,
            scheduler: config_file.animation.scheduler_config(),
            header_rows: config_file.ui.header_offset,
            floating_controls: config_file.ui.floating_controls,
            max_upload_bytes: config_file.upload.max_file_bytes,
        })
    }
}

fn print_help() {
    println!(
        r#"gv - GalleryView: terminal editor for an art gallery server

USAGE:
    gv [OPTIONS]

OPTIONS:
    -s, --server URL     Gallery server base URL (default http://127.0.0.1:5000)
    -c, --config FILE    Use FILE instead of the default config file
    -u, --upload FILES   Upload image files and exit
    --status             Print gallery stats as JSON and exit
    -h, --help           Show this help message
    -V, --version        Show version

CONFIG FILE:
    ~/.config/galleryview/config.toml

ENVIRONMENT:
    GALLERYVIEW_LOG      Log filter (default: info)

KEYBINDINGS:
    j/↓ k/↑     Move focus
    Enter       Open viewer (toggle selection in select mode)
    e           Enter edit mode
    s           Enter select mode (edit mode)
    a           Upload images (edit mode)
    Space       Toggle selection (select mode)
    Ctrl+A      Select all / deselect all (select mode)
    t / b       Move selection to top / bottom (select mode)
    Delete      Delete selection (select mode)
    r           Reload from server
    Esc         Back one level
    q           Quit"#
    );
}
