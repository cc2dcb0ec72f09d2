//! # cmdkit Error Types
//!
//! File: lib/src/core/error.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module defines the single error enum returned by the library. Each
//! variant corresponds to one failure category of the process subsystem:
//!
//! - **Malformed invocation**: an empty argument list or empty program name;
//!   nothing is started.
//! - **Launch failure**: the OS refused to start the program (missing binary,
//!   permissions).
//! - **Abnormal exit**: the program started but exited with a non-zero code or
//!   was killed by a signal.
//! - **Wait failure**: waiting on a started child failed.
//! - **PID file / termination**: reading, writing, or acting on a PID file failed.
//! - **Source closed**: a read on a closed [`ChannelSource`](crate::ChannelSource).
//!
//! Corrupt and missing PID files are *not* errors; the lifecycle helpers log
//! and absorb them. Output sink failures stay inside the `std::io::Error`
//! returned by the sink and are logged by the pump that hit them.
//!
//! ## Examples
//!
//! ```rust
//! use cmdkit::{CmdkitError, ExecutionUnit, OutputSinks};
//!
//! let err = ExecutionUnit::build(Vec::new(), OutputSinks::default()).unwrap_err();
//! assert!(matches!(err, CmdkitError::MalformedInvocation(_)));
//! ```
//!
use crate::common::process::Termination;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Error type for every fallible cmdkit operation.
#[derive(Error, Debug)]
pub enum CmdkitError {
    #[error("Malformed invocation: {0}")]
    MalformedInvocation(String),

    #[error("Failed to launch '{program}': {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    AbnormalExit(Termination),

    #[error("Failed to wait for process: {0}")]
    Wait(#[source] io::Error),

    #[error("PID file error at {}: {source}", .path.display())]
    PidFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to terminate process {pid}: {reason}")]
    Terminate { pid: i32, reason: String },

    #[error("channel source has been closed")]
    SourceClosed,
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, CmdkitError>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let malformed = CmdkitError::MalformedInvocation("empty argument list".into());
        assert_eq!(
            malformed.to_string(),
            "Malformed invocation: empty argument list"
        );

        let launch = CmdkitError::LaunchFailed {
            program: "nope".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(launch.to_string(), "Failed to launch 'nope': not found");

        let pid_file = CmdkitError::PidFile {
            path: PathBuf::from("/tmp/app.pid"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(pid_file.to_string(), "PID file error at /tmp/app.pid: denied");

        assert_eq!(
            CmdkitError::SourceClosed.to_string(),
            "channel source has been closed"
        );
    }

    #[test]
    fn test_abnormal_exit_display_uses_termination() {
        let err = CmdkitError::AbnormalExit(Termination {
            pid: Some(42),
            code: Some(3),
            signal: None,
        });
        assert_eq!(err.to_string(), "exit status 3");
    }
}
