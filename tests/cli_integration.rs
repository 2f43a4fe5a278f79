//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get the binary to test.
fn flowgen() -> Command {
    Command::cargo_bin("flowgen").unwrap()
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    flowgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plain-English sentence"));
}

#[test]
fn test_version_flag() {
    flowgen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// Generate Command Tests
// ============================================================================

#[test]
fn test_generate_reminder() {
    flowgen()
        .args(["generate", "Remind", "me", "to", "stretch", "every", "hour"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[reminders]"))
        .stdout(predicate::str::contains("Send the reminder"));
}

#[test]
fn test_generate_vague_input_asks_for_clarification() {
    flowgen()
        .args(["generate", "do", "stuff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("more detail"));
}

#[test]
fn test_generate_json_output() {
    flowgen()
        .args(["generate", "--json", "Set", "up", "a", "new", "React", "project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"domain\": \"app-setup\""))
        .stdout(predicate::str::contains("\"steps\""));
}

// ============================================================================
// Run Command Tests
// ============================================================================

#[test]
fn test_run_deterministic_success() {
    flowgen()
        .args(["run", "--fast", "--fail-rate", "0", "Remind", "me", "to", "stretch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow completed (3/3 steps)"));
}

#[test]
fn test_run_deterministic_failure_exits_nonzero() {
    // With a 100% failure rate the first non-condition step halts the run.
    flowgen()
        .args(["run", "--fast", "--fail-rate", "1", "check", "and", "update", "the", "records"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Workflow failed"))
        .stdout(predicate::str::contains("Simulated execution error"));
}

#[test]
fn test_run_json_record() {
    flowgen()
        .args(["run", "--fast", "--fail-rate", "0", "--json", "Send", "an", "email", "update"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"executionId\""))
        .stdout(predicate::str::contains("\"status\": \"completed\""));
}

#[test]
fn test_run_document_from_stdin() {
    // Generate a document, then feed it back unchanged through stdin.
    let output = flowgen()
        .args(["generate", "--json", "Remind", "me", "to", "stretch"])
        .output()
        .unwrap();
    let document = String::from_utf8(output.stdout).unwrap();

    flowgen()
        .args(["run", "--stdin", "--fast", "--fail-rate", "0"])
        .write_stdin(document)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflow completed (3/3 steps)"));
}

#[test]
fn test_run_rejects_invalid_document() {
    flowgen()
        .args(["run", "--stdin"])
        .write_stdin("not a workflow")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid workflow document"));
}
