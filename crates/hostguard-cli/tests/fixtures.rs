//! End-to-end CLI runs against the policies in `tests/fixtures/`.
//!
//! Each fixture directory holds a policy, an optional `hostguard.toml` and an
//! `expected.report.json` (nondeterministic fields replaced by placeholders). The fixture is
//! copied to a scratch directory first because some fixes create files.

use assert_cmd::Command;
use hostguard_test_util::normalize_nondeterministic;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn hostguard_cmd() -> Command {
    Command::cargo_bin("hostguard").expect("hostguard binary not found - run `cargo build` first")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("hostguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
}

/// Copy a fixture (without its golden report) into a fresh scratch directory.
fn stage(name: &str) -> TempDir {
    let src = fixtures_dir().join(name);
    let tmp = TempDir::new().expect("create temp dir");
    for entry in std::fs::read_dir(&src).expect("read fixture dir") {
        let entry = entry.expect("dir entry");
        let file_name = entry.file_name();
        if file_name == "expected.report.json" {
            continue;
        }
        std::fs::copy(entry.path(), tmp.path().join(&file_name)).expect("copy fixture file");
    }
    tmp
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read {}: {e}", path.display()));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("parse {}: {e}", path.display()))
}

/// Run `check` on a staged fixture and return (scratch dir, stdout).
fn run_fixture(name: &str, policy: &str) -> (TempDir, String) {
    let dir = stage(name);
    let output = hostguard_cmd()
        .current_dir(dir.path())
        .args([
            "check",
            "--policy",
            policy,
            "--no-prompt",
            "--color",
            "never",
            "--report-out",
            "out/report.json",
        ])
        .output()
        .expect("run hostguard");

    assert!(
        output.status.success(),
        "hostguard failed for {name}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    (dir, String::from_utf8_lossy(&output.stdout).into_owned())
}

fn assert_matches_golden(name: &str, dir: &TempDir) {
    let actual = normalize_nondeterministic(read_json(&dir.path().join("out/report.json")));
    let expected = read_json(&fixtures_dir().join(name).join("expected.report.json"));
    assert_eq!(
        actual,
        expected,
        "report mismatch for {name}:\n{}",
        serde_json::to_string_pretty(&actual).unwrap_or_default()
    );
}

#[test]
fn report_only_fixture() {
    let (dir, stdout) = run_fixture("report_only", "hostguard-policy.yml");
    assert_matches_golden("report_only", &dir);

    assert!(stdout.contains("CHECK #1: Echo reports enabled... PASSED!"));
    assert!(stdout.contains("CHECK #2: Feature flag is on... FAILED!"));
    assert!(stdout.contains("Rules failed and fix skipped:"));
    assert!(!stdout.contains("could not be automatically fixed"));
    assert!(stdout.contains("No rules need manual remediation."));
}

#[test]
fn fix_applied_fixture() {
    let (dir, stdout) = run_fixture("fix_applied", "hostguard-policy.json");
    assert_matches_golden("fix_applied", &dir);

    assert!(dir.path().join("marker").exists(), "fix should create the marker");
    assert!(stdout.contains("CHECK #1: Marker file present... FAILED!"));
    assert!(stdout.contains("CHECK #1: Marker file present... PASSED!"));
    assert!(stdout.contains("User lacks elevated privileges"));
    assert!(stdout.contains(
        "2 rules could not be automatically fixed, but manual instructions are available."
    ));
    assert!(stdout.contains("RULE #2: Service answers"));
    assert!(stdout.contains("RULE #3: Port closed"));
}

#[test]
fn skipped_fixture() {
    let (dir, stdout) = run_fixture("skipped", "hostguard-policy.toml");
    assert_matches_golden("skipped", &dir);

    assert!(stdout.contains("CHECK #1: Privileged probe only... SKIPPED!"));
    assert!(stdout.contains("RULE #3: Manual only"));
}

#[test]
fn check_is_the_default_command_and_finds_the_policy() {
    let dir = stage("report_only");
    hostguard_cmd()
        .current_dir(dir.path())
        .args(["--no-prompt", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hostguard "))
        .stdout(predicate::str::contains("Rules passed total:"));
}

#[test]
fn log_file_is_written_without_color() {
    let dir = stage("report_only");
    hostguard_cmd()
        .current_dir(dir.path())
        .args([
            "check",
            "--policy",
            "hostguard-policy.yml",
            "--color",
            "always",
            "--log-file",
            "logs/run.log",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote results to"))
        .stdout(predicate::str::contains("logs/run.log"));

    let log = std::fs::read_to_string(dir.path().join("logs/run.log")).expect("read log");
    assert!(log.contains("CHECK #1: Echo reports enabled... PASSED!"));
    assert!(log.contains("DEBUG: "), "debug lines are logged by default");
    assert!(!log.contains('\x1b'));
}

#[test]
fn markdown_from_saved_report() {
    let (dir, _) = run_fixture("fix_applied", "hostguard-policy.json");
    hostguard_cmd()
        .current_dir(dir.path())
        .args(["md", "--report", "out/report.json", "-o", "out/report.md"])
        .assert()
        .success();

    let md = std::fs::read_to_string(dir.path().join("out/report.md")).expect("read markdown");
    assert!(md.starts_with("# Hostguard report"));
    assert!(md.contains("## Manual remediation"));
    assert!(md.contains("### Rule #3: Port closed"));
}

#[test]
fn prompts_without_a_terminal_decline_every_fix() {
    let dir = stage("fix_applied");
    let output = hostguard_cmd()
        .current_dir(dir.path())
        .args([
            "check",
            "--policy",
            "hostguard-policy.json",
            "--color",
            "never",
            "--report-out",
            "out/report.json",
        ])
        .output()
        .expect("run hostguard");

    assert!(output.status.success());
    assert!(!dir.path().join("marker").exists(), "no fix may run without consent");

    let report = read_json(&dir.path().join("out/report.json"));
    assert_eq!(report["tally"]["fail_fix_declined"], 3);
    assert_eq!(report["tally"]["pass_after_fix"], 0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("declining fixes").count(), 1);
}
