//! Basic CLI tests for gv
//!
//! Tests for command-line argument parsing, help output, version display,
//! and error handling for invalid inputs.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn gv() -> Command {
    let mut cmd = cargo_bin_cmd!("gv");
    cmd.env("GALLERYVIEW_LOG", "off");
    cmd
}

// =============================================================================
// Help and Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    gv().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"))
        .stdout(predicate::str::contains("gv"))
        .stdout(predicate::str::contains("--upload"));
}

#[test]
fn help_short_flag_shows_usage() {
    gv().arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("USAGE:"));
}

#[test]
fn help_lists_select_mode_keys() {
    gv().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ctrl+A"))
        .stdout(predicate::str::contains("select mode"));
}

#[test]
fn version_flag_shows_version() {
    gv().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_short_flag_shows_version() {
    gv().arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// =============================================================================
// Invalid Options (Exit Code 2)
// =============================================================================

#[test]
fn unknown_option_returns_exit_code_2() {
    gv().arg("--unknown-option")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown option"));
}

#[test]
fn positional_argument_returns_exit_code_2() {
    gv().arg("gallery")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown option"));
}

#[test]
fn server_without_url_returns_exit_code_2() {
    gv().arg("--server")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires a URL"));
}

#[test]
fn server_with_non_http_url_returns_exit_code_2() {
    gv().args(["--server", "ftp://gallery"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("http(s)"));
}

#[test]
fn upload_without_files_returns_exit_code_2() {
    gv().arg("--upload")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("at least one file"));
}

// =============================================================================
// Non-interactive Modes
// =============================================================================

#[test]
fn upload_of_non_images_fails_without_contacting_server() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "").unwrap();
    let notes = temp_dir.path().join("notes.txt");
    fs::write(&notes, "not an image").unwrap();

    gv().args(["--config", config.to_str().unwrap()])
        .args(["--server", "http://127.0.0.1:9"])
        .arg("--upload")
        .arg(&notes)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("notes.txt: not an image file"))
        .stderr(predicate::str::contains("No valid images to upload"));
}

#[test]
fn status_with_unreachable_server_returns_exit_code_1() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[server]\ntimeout_secs = 2\n").unwrap();

    gv().args(["--config", config.to_str().unwrap()])
        .args(["--server", "http://127.0.0.1:9"])
        .arg("--status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}
