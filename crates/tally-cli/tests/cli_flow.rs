//! End-to-end tests running the `tally` binary against a temp storage file.
//!
//! Tests the full pipeline: init → import → report / events / audit.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

fn tally_binary() -> String {
    env!("CARGO_BIN_EXE_tally").to_string()
}

/// Command with config isolated to `temp` and storage at `storage.json`.
fn tally(temp: &Path) -> Command {
    let mut cmd = Command::new(tally_binary());
    cmd.env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join("config"))
        .env("TALLY_STORAGE_PATH", storage_path(temp))
        .env_remove("TALLY_RULES")
        .env_remove("TALLY_SAMPLE_LIMIT");
    cmd
}

fn storage_path(temp: &Path) -> PathBuf {
    temp.join("data").join("storage.json")
}

fn run_ok(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to run tally");
    assert_success(&output);
    String::from_utf8(output.stdout).unwrap()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "tally should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn import(temp: &Path, input: &str) -> String {
    let mut child = tally(temp)
        .arg("import")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn tally import");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output);
    String::from_utf8(output.stdout).unwrap()
}

const EVENTS: &str = r#"[
  {"id": "1", "title": "Morning Workout", "startTime": "2024-01-01T07:00:00Z", "endTime": "2024-01-01T08:00:00Z", "allDay": false},
  {"id": "2", "title": "Team Sync", "startTime": "2024-01-01T09:00:00Z", "endTime": "2024-01-01T10:30:00Z", "allDay": false},
  {"id": "3", "title": "Holiday", "startTime": "2024-01-01", "endTime": "2024-01-02", "allDay": true}
]"#;

fn seeded() -> TempDir {
    let temp = TempDir::new().unwrap();
    run_ok(tally(temp.path()).arg("init"));
    let out = import(temp.path(), EVENTS);
    assert_eq!(out.trim(), "Imported 3 events");
    temp
}

#[test]
fn test_init_creates_document_once() {
    let temp = TempDir::new().unwrap();

    let out = run_ok(tally(temp.path()).arg("init"));
    assert!(out.starts_with("Created:"), "{out}");
    let doc: Value =
        serde_json::from_str(&std::fs::read_to_string(storage_path(temp.path())).unwrap())
            .unwrap();
    assert!(doc["goals"].is_array());
    assert_eq!(doc["categories"].as_array().unwrap().len(), 6);

    let out = run_ok(tally(temp.path()).arg("init"));
    assert!(out.starts_with("Exists:"), "{out}");
}

#[test]
fn test_report_json_totals() {
    let temp = seeded();

    let out = run_ok(tally(temp.path()).args(["report", "--json"]));
    let report: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(report["rules"], "final");
    assert_eq!(report["total_hours"], 2.5);
    assert_eq!(report["event_count"], 2);
    assert_eq!(report["skipped_all_day"], 1);
    assert_eq!(report["categories"]["exercise"]["hours"], 1.0);
    assert_eq!(report["categories"]["work"]["hours"], 1.5);
    assert_eq!(report["categories"]["work"]["percent"], 60.0);
    assert_eq!(report["categories"]["miscellaneous"]["event_count"], 0);
}

#[test]
fn test_report_with_v2_rules_counts_workout_as_work() {
    let temp = seeded();

    let out = run_ok(tally(temp.path()).args(["report", "--json", "--rules", "v2"]));
    let report: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(report["rules"], "v2");
    assert_eq!(report["categories"]["work"]["hours"], 2.5);
    assert_eq!(report["categories"]["exercise"]["hours"], 0.0);
}

#[test]
fn test_report_text_and_range() {
    let temp = seeded();

    let out = run_ok(tally(temp.path()).args([
        "report",
        "--start",
        "2024-01-01T08:30:00Z",
        "--end",
        "2024-01-02T00:00:00Z",
    ]));
    assert!(out.contains("TIME BY CATEGORY (final rules)"), "{out}");
    assert!(out.contains("WORK: 1.50 hours (1 events) - 100.0%"), "{out}");
    assert!(!out.contains("EXERCISE:"), "{out}");
    assert!(out.contains("TOTAL: 1.50 hours across 1 events"), "{out}");
}

#[test]
fn test_import_skips_known_ids() {
    let temp = seeded();

    let out = import(
        temp.path(),
        r#"{"id": "2", "title": "Team Sync", "startTime": "2024-01-01T09:00:00Z", "endTime": "2024-01-01T10:30:00Z"}
{"id": "4", "title": "Journal", "startTime": "2024-01-02T21:00:00Z", "endTime": "2024-01-02T21:30:00Z"}"#,
    );
    assert_eq!(out.trim(), "Imported 1 events");

    let out = run_ok(tally(temp.path()).arg("events"));
    let lines: Vec<Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3]["category"], "personal development");
    assert!(lines[2]["category"].is_null());
}

#[test]
fn test_classify_without_storage() {
    let temp = TempDir::new().unwrap();

    let out = run_ok(tally(temp.path()).args(["classify", "Brunch", "Nap"]));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("exercise"), "{out}");
    assert!(lines[1].starts_with("miscellaneous"), "{out}");
}

#[test]
fn test_audit_json() {
    let temp = seeded();

    let out = run_ok(tally(temp.path()).args(["audit", "--json"]));
    let audits: Value = serde_json::from_str(&out).unwrap();
    let audits = audits.as_array().unwrap();
    assert_eq!(audits.len(), 13);
    assert_eq!(audits[0]["claimed"], 1);
    assert_eq!(audits[12]["claimed"], 1);
}

#[test]
fn test_report_without_storage_fails() {
    let temp = TempDir::new().unwrap();

    let output = tally(temp.path()).arg("report").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tally init"), "{stderr}");
}
