//! # cmdkit Common Utilities (`common`)
//!
//! File: lib/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Root of the utility modules. Each submodule covers one domain:
//!
//! - **`process`**: tokenizing command lines, launching external programs,
//!   capturing their output, PID files and termination.
//! - **`slices`**: generic helpers for membership, set-like operations,
//!   chunking, padding, shuffling and random sampling.
//! - **`text`**: regex-based validators (email, URL, username, line detection).
//!
//! ```rust
//! use cmdkit::common::{process, slices, text};
//!
//! assert_eq!(process::tokenizer::tokenize("ls -la"), vec!["ls", "-la"]);
//! assert!(slices::contains_ignore_case(&["Alpha", "beta"], "ALPHA"));
//! assert!(text::is_single_line_text("one line"));
//! ```
//!

/// Tokenizing, launching and supervising external processes.
pub mod process;
/// Generic slice helpers.
pub mod slices;
/// Regex-based string validators.
pub mod text;
