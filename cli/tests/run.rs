//! # cmdkit CLI Run Integration Tests
//!
//! File: cli/tests/run.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `cmdkit run`. They launch small POSIX utilities, so
//! they only run on Unix.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_run_passes_output_through() {
    cmdkit_cmd()
        .args(["run", "echo hello world"])
        .assert()
        .success()
        .stdout("hello world\n");
}

#[test]
fn test_run_failure_exits_with_status_one() {
    cmdkit_cmd()
        .args(["run", r#"sh -c "exit 3""#])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("The process exited abnormally"))
        .stderr(predicate::str::contains("exit status 3"));
}

#[test]
fn test_run_missing_program_fails() {
    cmdkit_cmd()
        .args(["run", "cmdkit-no-such-program --flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cmdkit-no-such-program"));
}

#[test]
fn test_run_honours_dir_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "").unwrap();
    cmdkit_cmd()
        .args(["run", "--dir"])
        .arg(dir.path())
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("marker.txt"));
}

#[test]
fn test_run_uses_configured_env() {
    let project = project_with_config("[process.env]\nCMDKIT_RUN_VAR = \"from-config\"\n");
    cmdkit_cmd_in(project.path())
        .args(["run", r#"sh -c "printf %s $CMDKIT_RUN_VAR""#])
        .assert()
        .success()
        .stdout("from-config");
}

#[test]
fn test_run_timed_reports_window_summary() {
    cmdkit_cmd()
        .args(["run", "--timed", "--window-ms", "300", "echo quick"])
        .assert()
        .success()
        .stdout("quick\n")
        .stderr(predicate::str::contains(
            "Captured 6 stdout bytes and 0 stderr bytes within 300ms",
        ));
}

#[test]
fn test_run_rejects_invalid_config() {
    let project = project_with_config("[process]\ncapture_window_ms = 0\n");
    cmdkit_cmd_in(project.path())
        .args(["run", "echo never"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capture_window_ms"));
}
