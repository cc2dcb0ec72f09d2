//! # cmdkit Core Infrastructure
//!
//! File: lib/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by every utility module. Currently this is the
//! error type (`error`), used by the tokenizer-driven launcher, the capture
//! adapters and the PID-file lifecycle helpers alike.
//!
//! ```rust
//! use cmdkit::core::error::{CmdkitError, Result};
//! ```
//!
pub mod error;
