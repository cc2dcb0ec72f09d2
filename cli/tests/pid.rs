//! # cmdkit CLI PID Integration Tests
//!
//! File: cli/tests/pid.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Integration tests for `cmdkit pid write|kill|kill-pid`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_pid_write_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cmdkit.pid");
    cmdkit_cmd()
        .args(["pid", "write"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote PID"));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.ends_with('\n'));
    assert!(content.trim().parse::<u32>().is_ok());
}

#[test]
fn test_pid_kill_missing_file_is_ok() {
    let dir = tempdir().unwrap();
    cmdkit_cmd()
        .args(["pid", "kill"])
        .arg(dir.path().join("absent.pid"))
        .assert()
        .success();
}

#[test]
fn test_pid_kill_corrupt_file_is_ok() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.pid");
    fs::write(&path, "garbage").unwrap();
    cmdkit_cmd().args(["pid", "kill"]).arg(&path).assert().success();
}

#[test]
fn test_pid_write_uses_configured_file() {
    let project = project_with_config("");
    let pid_path = project.path().join("configured.pid");
    fs::write(
        project.path().join(".cmdkit.toml"),
        format!("[pid]\nfile = {:?}\n", pid_path.to_string_lossy()),
    )
    .unwrap();

    cmdkit_cmd_in(project.path())
        .args(["pid", "write"])
        .assert()
        .success();
    assert!(pid_path.exists());
}

#[test]
fn test_pid_kill_without_path_or_config_fails() {
    let project = project_with_config("");
    cmdkit_cmd_in(project.path())
        .env("XDG_CONFIG_HOME", project.path())
        .env("HOME", project.path())
        .args(["pid", "kill"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pid.file"));
}

#[cfg(unix)]
#[test]
fn test_pid_kill_terminates_live_process() {
    use std::os::unix::process::ExitStatusExt;

    let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("sleep.pid");
    fs::write(&path, format!("{}\n", child.id())).unwrap();

    cmdkit_cmd()
        .args(["pid", "kill"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed process"));
    assert_eq!(child.wait().unwrap().signal(), Some(9));
}

#[test]
fn test_pid_kill_pid_zero_is_a_no_op() {
    cmdkit_cmd().args(["pid", "kill-pid", "0"]).assert().success();
}
