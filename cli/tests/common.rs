//! # cmdkit CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each test
//! file declares `mod common;` and pulls these in with `use common::*;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get cmdkit Command (`cmdkit_cmd`)
///
/// An `assert_cmd::Command` for the compiled `cmdkit` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn cmdkit_cmd() -> Command {
    Command::cargo_bin("cmdkit").expect("Failed to find cmdkit binary for testing")
}

/// Like [`cmdkit_cmd`], but running inside `dir` so that a `.cmdkit.toml`
/// placed there (next to a `.git` marker) is the only project configuration seen.
pub fn cmdkit_cmd_in(dir: &std::path::Path) -> Command {
    let mut cmd = cmdkit_cmd();
    cmd.current_dir(dir);
    cmd
}

/// Creates an isolated project directory with a `.git` marker and the given
/// `.cmdkit.toml` content.
pub fn project_with_config(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp project dir");
    std::fs::create_dir(dir.path().join(".git")).expect("Failed to create .git marker");
    std::fs::write(dir.path().join(".cmdkit.toml"), config).expect("Failed to write config");
    dir
}
