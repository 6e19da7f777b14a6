//! Integration tests for the diagpull command line
//!
//! Every test stops before a browser would be launched.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn diagpull() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("diagpull"));
    cmd.env("NO_COLOR", "1")
        .env_remove("DIAGPULL_BROWSER")
        .env_remove("DIAGPULL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    diagpull().assert().code(2).stderr(predicate::str::contains(
        "Collect and download a diagnostics bundle",
    ));
}

#[test]
fn test_cli_help_lists_arguments_and_options() {
    diagpull()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("<HOST>"))
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("[default: 900]"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    diagpull()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("diagpull 0.1.0"));
}

// --- Usage errors ---

#[test]
fn test_missing_credentials_is_usage_error() {
    diagpull()
        .arg("192.168.1.1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<USERNAME>"));
}

#[test]
fn test_non_numeric_timeout_is_usage_error() {
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "--timeout", "soon"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn test_zero_timeout_is_usage_error() {
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "-t", "0"])
        .assert()
        .code(2);
}

// --- Setup failures ---

#[test]
fn test_missing_browser_fails_before_launch() {
    let out = tempfile::tempdir().expect("tempdir");
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "--browser", "/nonexistent/chrome", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("browser executable /nonexistent/chrome not found"))
        .stdout(predicate::str::contains("Failed."));
}

#[test]
fn test_browser_env_var_is_honoured() {
    let out = tempfile::tempdir().expect("tempdir");
    diagpull()
        .env("DIAGPULL_BROWSER", "/nonexistent/from-env")
        .args(["192.168.1.1", "admin", "secret", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/from-env not found"));
}

#[test]
fn test_missing_config_file_fails_setup() {
    let out = tempfile::tempdir().expect("tempdir");
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "--config", "/nonexistent/diagpull.yaml", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file /nonexistent/diagpull.yaml not found"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.yaml");
    std::fs::write(&config, "device:\n  artifact_marker: ''\n").expect("write config");
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "--config"])
        .arg(&config)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("device.artifact_marker"));
}

#[test]
fn test_empty_host_fails_setup() {
    diagpull()
        .args(["", "admin", "secret"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Device address must not be empty"));
}

#[test]
fn test_output_dir_is_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("bundles").join("today");
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "--browser", "/nonexistent/chrome", "-o"])
        .arg(&out)
        .assert()
        .code(1);
    assert!(out.is_dir());
}

// --- JSON mode ---

#[test]
fn test_json_setup_error_is_single_object_on_stdout() {
    let out = tempfile::tempdir().expect("tempdir");
    let assert = diagpull()
        .args(["192.168.1.1", "admin", "secret", "--json", "--browser", "/nonexistent/chrome", "-o"])
        .arg(out.path())
        .assert()
        .code(1);
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "setup_failed");
    assert!(
        value["message"]
            .as_str()
            .expect("message")
            .contains("not found")
    );
}

#[test]
fn test_quiet_suppresses_verdict_but_not_error() {
    let out = tempfile::tempdir().expect("tempdir");
    diagpull()
        .args(["192.168.1.1", "admin", "secret", "-q", "--browser", "/nonexistent/chrome", "-o"])
        .arg(out.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found"));
}
