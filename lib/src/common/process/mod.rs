//! # cmdkit Process Execution Utilities (`common::process`)
//!
//! File: lib/src/common/process/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module groups everything needed to run external programs from Rust
//! without going through a shell:
//!
//! - **`tokenizer`**: turns `tool -c "my file.yaml" -p=3` into an argument list,
//!   honouring quotes, `\"` escapes and environment placeholders.
//! - **`launcher`**: builds an `ExecutionUnit` (program, args, working dir,
//!   sinks, stdin) and runs it synchronously, in the background, or with a
//!   bounded capture window.
//! - **`capture`**: sink and source adapters (`CallbackSink`, `ChannelSource`,
//!   `TimedSink`, `CapturedBuffer`).
//! - **`lifecycle`**: PID files and PID-based termination.
//! - **`hook`**: the strategy invoked whenever a launched process exits abnormally.
//!
//! ## Architecture
//!
//! Each started process gets one tokio task per piped output stream (copying
//! into the configured sink), an optional task feeding stdin, and, for
//! background launches, one waiter task. There is no pool and no queue: every
//! call starts a new process immediately.
//!
//! ## Usage
//!
//! ```no_run
//! use cmdkit::{ExecutionUnit, Launcher, OutputSinks};
//! use std::time::Duration;
//!
//! # async fn example() -> cmdkit::Result<()> {
//! let unit = ExecutionUnit::from_command("ping -c 5 localhost", OutputSinks::default())?;
//! let mut timed = Launcher::new().spawn_timed(unit, Duration::from_secs(1)).await?;
//! println!("first second of output: {}", timed.stdout.to_string_lossy());
//! timed.process.wait().await;
//! # Ok(())
//! # }
//! ```
//!
use std::fmt;
use std::process::ExitStatus;

pub mod capture;
pub mod hook;
pub mod launcher;
pub mod lifecycle;
pub mod tokenizer;

/// Details of an abnormal process exit, handed to the exit hook and carried
/// by [`CmdkitError::AbnormalExit`](crate::CmdkitError::AbnormalExit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Termination {
    /// OS process ID, if the child reported one before exiting.
    pub pid: Option<u32>,
    /// Exit code, when the process exited on its own.
    pub code: Option<i32>,
    /// Terminating signal number (Unix only).
    pub signal: Option<i32>,
}

impl Termination {
    /// Builds the termination details from a finished child's status.
    pub fn from_status(pid: Option<u32>, status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            pid,
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit status {code}"),
            (None, Some(signal)) => write!(f, "signal: {signal}"),
            (None, None) => write!(f, "terminated abnormally"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_display() {
        let exited = Termination {
            pid: Some(7),
            code: Some(2),
            signal: None,
        };
        assert_eq!(exited.to_string(), "exit status 2");

        let signalled = Termination {
            pid: Some(7),
            code: None,
            signal: Some(9),
        };
        assert_eq!(signalled.to_string(), "signal: 9");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_status_reads_exit_code() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status: exit code lives in the second byte.
        let status = ExitStatus::from_raw(3 << 8);
        let termination = Termination::from_status(Some(10), status);
        assert_eq!(termination.code, Some(3));
        assert_eq!(termination.signal, None);
        assert_eq!(termination.pid, Some(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_status_reads_signal() {
        use std::os::unix::process::ExitStatusExt;
        let status = ExitStatus::from_raw(9);
        let termination = Termination::from_status(None, status);
        assert_eq!(termination.code, None);
        assert_eq!(termination.signal, Some(9));
    }
}
