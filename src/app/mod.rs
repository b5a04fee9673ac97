//! Application module
//!
//! This module contains the configuration layers, the terminal surface
//! the animation scheduler drives, and the event loop for GalleryView.

mod config;
mod config_file;
mod event_loop;
mod render;
mod surface;

pub use config::{exit_code, Config};
pub use config_file::ConfigFile;
pub use event_loop::run_app;
pub use surface::TerminalSurface;
