//! Integration tests driving the `tourney-cli` binary as a subprocess, in
//! the style of the other example repos' `CARGO_BIN_EXE_*` tests: each test
//! writes a request document to a temp file and checks the process's exit
//! code and stdout/stderr.

use std::path::PathBuf;
use std::process::Command;

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tourney-cli"))
}

fn write_document(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("request.json");
    std::fs::write(&path, contents).expect("failed to write request document");
    path
}

#[test]
fn schedule_command_produces_a_complete_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"{
            "participants": [
                {"id": "a", "label": "A"},
                {"id": "b", "label": "B"},
                {"id": "c", "label": "C"},
                {"id": "d", "label": "D"}
            ]
        }"#,
    );

    let output = Command::new(binary())
        .args(["schedule"])
        .arg(&path)
        .output()
        .expect("failed to run tourney-cli schedule");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let schedule: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(schedule["events"].as_array().unwrap().len(), 6);
}

#[test]
fn schedule_command_reports_incomplete_schedule_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"{
            "participants": [
                {"id": "a", "label": "A"},
                {"id": "b", "label": "B"},
                {"id": "c", "label": "C"},
                {"id": "d", "label": "D"}
            ],
            "legs": 2,
            "constraints": [{"type": "no_repeat_pairings"}]
        }"#,
    );

    let output = Command::new(binary())
        .args(["schedule"])
        .arg(&path)
        .output()
        .expect("failed to run tourney-cli schedule");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INCOMPLETE SCHEDULE DIAGNOSTIC REPORT"));
    assert!(stderr.contains("NoRepeatPairings"));
}

#[test]
fn structure_command_needs_no_request_document() {
    let output = Command::new(binary())
        .args(["structure", "--participants", "5"])
        .output()
        .expect("failed to run tourney-cli structure");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let structure: serde_json::Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(structure["rounds"].as_array().unwrap().len(), 5);
}

#[test]
fn validate_command_accepts_a_well_formed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(
        &dir,
        r#"{"participants": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}]}"#,
    );

    let output = Command::new(binary())
        .args(["validate"])
        .arg(&path)
        .output()
        .expect("failed to run tourney-cli validate");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"valid\": true"));
}

#[test]
fn validate_command_rejects_a_single_participant() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(&dir, r#"{"participants": [{"id": "a", "label": "A"}]}"#);

    let output = Command::new(binary())
        .args(["validate"])
        .arg(&path)
        .output()
        .expect("failed to run tourney-cli validate");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("INVALID CONFIGURATION DIAGNOSTIC REPORT"));
}
