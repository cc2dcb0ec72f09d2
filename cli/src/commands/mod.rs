//! # cmdkit Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the `cmdkit` CLI. Each
//! command defines its own Clap arguments struct and an async `handle_*`
//! function that `main.rs` dispatches to.
//!
//! ## Command Groups
//!
//! - `tokenize`: show how a command line is split into arguments
//! - `run`: launch a command, optionally with a bounded capture window
//! - `pid`: write PID files and terminate processes by PID
//! - `check`: run one of the text validators against a value
//!

/// `cmdkit check`: validate emails, URLs, usernames and line structure.
pub mod check;
/// `cmdkit pid`: PID-file lifecycle (`write`, `kill`, `kill-pid`).
pub mod pid;
/// `cmdkit run`: tokenize and run a command string.
pub mod run;
/// `cmdkit tokenize`: print the argument list for a command string.
pub mod tokenize;
