//! Basic CLI E2E tests.
//!
//! Tests run the built `pomolog` binary against a throwaway data directory
//! and verify outputs.

use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command with `home` as the data directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_pomolog"))
        .args(args)
        .env("POMOLOG_HOME", home)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Data dir with one-second test runs so timer tests finish quickly.
fn fast_home() -> TempDir {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "timer.test_seconds", "1"]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    home
}

fn history_json(home: &Path) -> Vec<serde_json::Value> {
    let (code, stdout, stderr) = run_cli(home, &["history", "--json"]);
    assert_eq!(code, 0, "history failed: {stderr}");
    serde_json::from_str(&stdout).expect("history --json should be a JSON array")
}

#[test]
fn test_config_get_default() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_set_persists() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "set", "timer.focus_minutes", "50"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"]);
    assert_eq!(stdout.trim(), "50");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_rejects_out_of_range_focus() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "timer.focus_minutes", "200"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"), "stderr: {stderr}");

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "timer.focus_minutes"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_list_is_json() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["task"]["default_name"], "Untitled Task");
    assert_eq!(parsed["log"]["backend"], "sqlite");
}

#[test]
fn test_history_empty() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["history"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "No sessions logged yet.");
}

#[test]
fn test_store_init() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["store", "init"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sqlite"));
    assert!(home.path().join("pomolog.db").exists());
}

#[test]
fn test_timer_run_logs_test_session() {
    let home = fast_home();
    let (code, stdout, stderr) = run_cli(
        home.path(),
        &["timer", "run", "--mode", "test", "--task", "Proofread"],
    );
    assert_eq!(code, 0, "timer run failed: {stderr}");
    assert!(stdout.contains("Test Run complete"));

    let records = history_json(home.path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["task_name"], "Proofread");
    assert_eq!(records[0]["type"], "Test Run");
    assert_eq!(records[0]["duration_min"], 0.02);

    let (_, table, _) = run_cli(home.path(), &["history"]);
    assert!(table.starts_with("Date"));
    assert!(table.contains("Proofread"));
    assert!(table.contains("Test Run"));
}

#[test]
fn test_timer_run_json_events() {
    let home = fast_home();
    let (code, stdout, _) = run_cli(home.path(), &["timer", "run", "--mode", "test", "--json"]);
    assert_eq!(code, 0);

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line should be one JSON event"))
        .collect();
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["type"].as_str()).collect();
    assert_eq!(kinds.first(), Some(&"StateSnapshot"));
    assert!(kinds.contains(&"TimerStarted"));
    assert_eq!(kinds.iter().filter(|k| **k == "TimerCompleted").count(), 1);
    assert!(kinds.contains(&"SessionLogged"));

    let logged = events.iter().find(|e| e["type"] == "SessionLogged").unwrap();
    assert_eq!(logged["record"]["task_name"], "Untitled Task");
}

#[test]
fn test_timer_dry_run_persists_nothing() {
    let home = fast_home();
    let (code, _, _) = run_cli(home.path(), &["timer", "run", "--mode", "test", "--dry-run"]);
    assert_eq!(code, 0);
    assert!(history_json(home.path()).is_empty());
}

#[test]
fn test_stats_counts_test_runs() {
    let home = fast_home();
    let (code, _, _) = run_cli(home.path(), &["timer", "run", "--mode", "test"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(home.path(), &["stats", "--json"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["test_runs"], 1);
}

#[test]
fn test_stats_requires_sqlite() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "log.backend", "sheets"]);
    assert_eq!(code, 0);
    let (code, _, stderr) = run_cli(home.path(), &["stats"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("sqlite"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pomolog"));
}
