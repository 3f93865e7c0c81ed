//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify exit codes and output shape.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "stillbell-cli", "--"])
        .args(args)
        .env("STILLBELL_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn config_show_prints_toml() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("[schedule]"));
    assert!(stdout.contains("interval_min"));
}

#[test]
fn config_set_rejects_empty_weekdays() {
    let (_, stderr, code) = run_cli(&["config", "set", "--weekdays", ""]);
    assert_ne!(code, 0);
    let _ = stderr;
}

#[test]
fn status_prints_next_target() {
    let (stdout, _, code) = run_cli(&["status"]);
    assert_eq!(code, 0, "status failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("status output should be JSON");
    assert!(parsed["next_target"].is_string());
    assert!(parsed["daytime"].is_boolean());
}

#[test]
fn meditate_dry_run_prints_schedule() {
    let (stdout, _, code) = run_cli(&["meditate", "--dry-run"]);
    assert_eq!(code, 0, "meditate --dry-run failed");
    assert!(stdout.contains("period 1"));
    assert!(stdout.contains("meditation ending"));
}

#[test]
fn stats_count_is_numeric() {
    let (stdout, _, code) = run_cli(&["stats", "count"]);
    assert_eq!(code, 0, "stats count failed");
    assert!(stdout.trim().parse::<u64>().is_ok());
}
