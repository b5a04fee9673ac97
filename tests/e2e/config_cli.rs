//! E2E tests for configuration CLI options
//!
//! Tests for --config handling and the config file documentation:
//! - --config / -c: Load an explicit config file
//! - Broken or missing files are argument errors
//! - Config file documentation in help

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn gv() -> Command {
    let mut cmd = cargo_bin_cmd!("gv");
    cmd.env("GALLERYVIEW_LOG", "off");
    cmd
}

// =============================================================================
// Help Output Contains Config File Info
// =============================================================================

#[test]
fn help_shows_config_file_section() {
    gv().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CONFIG FILE:"));
}

#[test]
fn help_shows_config_toml_path() {
    gv().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("galleryview/config.toml"));
}

#[test]
fn help_shows_log_environment_variable() {
    gv().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("GALLERYVIEW_LOG"));
}

// =============================================================================
// --config Option
// =============================================================================

#[test]
fn config_without_path_returns_exit_code_2() {
    gv().arg("--config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires a file path"));
}

#[test]
fn missing_config_file_returns_exit_code_2() {
    gv().args(["--config", "/nonexistent/galleryview/config.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot load"));
}

#[test]
fn invalid_toml_returns_exit_code_2() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "[server").unwrap();

    gv().args(["-c", path.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot load"));
}

#[test]
fn unknown_floating_control_returns_exit_code_2() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[ui]\nfloating_controls = [\"search-box\"]\n").unwrap();

    gv().args(["-c", path.to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot load"));
}

#[test]
fn valid_config_file_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "[server]\nbase_url = \"http://127.0.0.1:9\"\n\n[animation]\nupdate_ms = 250\n",
    )
    .unwrap();
    let notes = temp_dir.path().join("notes.txt");
    fs::write(&notes, "text").unwrap();

    // Gets past argument parsing and fails on the upload instead
    gv().args(["-c", path.to_str().unwrap()])
        .arg("--upload")
        .arg(&notes)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No valid images to upload"));
}
