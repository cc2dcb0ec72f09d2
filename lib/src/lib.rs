//! # cmdkit Library Root
//!
//! File: lib/src/lib.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `cmdkit` is a small toolbox of commonly used helpers, centred on running
//! external programs:
//!
//! - **Command tokenizing**: split a command line into arguments with quote
//!   and escape handling plus `{$NAME}` / `{%NAME%}` environment placeholders.
//! - **Process launching**: build an [`ExecutionUnit`] from arguments or a
//!   command string, wire output sinks and an optional stdin source, then run
//!   it to completion or in the background through a [`Launcher`].
//! - **Output capture**: callback-driven sinks, a rendezvous channel usable as
//!   stdin, and a sink that keeps a copy of only what arrives within a time window.
//! - **Process lifecycle**: PID files and PID-based termination, plus the
//!   pluggable hook called whenever a launched process exits abnormally.
//! - **Text validators** and **slice helpers** for everyday chores.
//!
//! ## Architecture
//!
//! - `core`: the library-wide error type.
//! - `common::process`: tokenizer, launcher, capture adapters, lifecycle, exit hook.
//! - `common::text`: regex-based validators.
//! - `common::slices`: generic slice utilities.
//!
//! ## Usage
//!
//! ```no_run
//! use cmdkit::{ExecutionUnit, Launcher, OutputSinks};
//!
//! # async fn example() -> cmdkit::Result<()> {
//! let unit = ExecutionUnit::from_command(r#"git log -n 1 "--format=%H""#, OutputSinks::default())?;
//! let status = Launcher::new().run(unit).await?;
//! assert!(status.success());
//! # Ok(())
//! # }
//! ```
//!
pub mod common;
pub mod core;

pub use crate::common::process::{
    capture::{
        channel_source, is_source_closed, CallbackSink, CapturedBuffer, ChannelSender,
        ChannelSource, TimedSink,
    },
    hook::{DiagnosticHook, ExitHook},
    launcher::{
        BoxedSink, BoxedSource, CapturedOutput, Completion, ExecutionUnit, Launcher, OutputSinks,
        RunningProcess, TimedRun,
    },
    lifecycle::{
        close_process_from_pid, close_process_from_pid_file, read_pid_file, write_pid_file,
    },
    tokenizer::{tokenize, tokenize_with},
    Termination,
};
pub use crate::core::error::{CmdkitError, Result};
