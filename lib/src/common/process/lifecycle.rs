//! # Process Lifecycle (`common::process::lifecycle`)
//!
//! File: lib/src/common/process/lifecycle.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! PID-file bookkeeping and PID-based forced termination.
//!
//! A PID file holds a single decimal integer followed by `\n`. Writers
//! overwrite it; readers trim surrounding whitespace before parsing. A
//! missing or corrupt file is not an error: there is simply nothing to close.
//!
//! Termination is forceful (`SIGKILL` via `nix` on Unix, `taskkill /F` on
//! Windows). A PID that no longer exists counts as already closed.
//!
//! ## Usage
//!
//! ```no_run
//! use cmdkit::{close_process_from_pid_file, write_pid_file};
//!
//! # fn example() -> cmdkit::Result<()> {
//! write_pid_file("/tmp/worker.pid")?;
//! // ... later, from a supervisor:
//! close_process_from_pid_file("/tmp/worker.pid")?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{CmdkitError, Result};
use std::{fs, io, path::Path};
use tracing::{debug, error, info};

/// Writes the current process's PID to `path`, replacing any previous content.
///
/// An empty path is a no-op.
///
/// # Errors
///
/// [`CmdkitError::PidFile`] if the file cannot be written.
pub fn write_pid_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    let pid = std::process::id();
    fs::write(path, format!("{pid}\n")).map_err(|source| CmdkitError::PidFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(pid, path = %path.display(), "Wrote PID file");
    Ok(())
}

/// Reads the PID stored in `path`.
///
/// Returns `Ok(None)` for an empty path, a missing file, or content that is
/// not an integer (the latter is logged at error level).
pub fn read_pid_file(path: impl AsRef<Path>) -> Result<Option<i32>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Ok(None);
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "PID file does not exist");
            return Ok(None);
        }
        Err(source) => {
            return Err(CmdkitError::PidFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    match content.trim().parse::<i32>() {
        Ok(pid) => Ok(Some(pid)),
        Err(e) => {
            error!(path = %path.display(), content = %content.trim(), error = %e, "PID file does not contain a valid PID");
            Ok(None)
        }
    }
}

/// Reads the PID in `path` and terminates that process.
///
/// Succeeds without doing anything when the path is empty or the file is
/// missing or corrupt.
pub fn close_process_from_pid_file(path: impl AsRef<Path>) -> Result<()> {
    match read_pid_file(path)? {
        Some(pid) => close_process_from_pid(pid),
        None => Ok(()),
    }
}

/// Forcefully terminates the process with the given PID.
///
/// `pid <= 0` is a no-op (it would otherwise address a process group). A
/// process that has already exited counts as closed.
///
/// # Errors
///
/// [`CmdkitError::Terminate`] if the process exists but cannot be killed.
pub fn close_process_from_pid(pid: i32) -> Result<()> {
    if pid <= 0 {
        return Ok(());
    }
    terminate(pid)
}

#[cfg(unix)]
fn terminate(pid: i32) -> Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    match kill(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) => {
            info!(pid, "Sent SIGKILL to process");
            Ok(())
        }
        Err(Errno::ESRCH) => {
            debug!(pid, "Process already exited");
            Ok(())
        }
        Err(errno) => Err(CmdkitError::Terminate {
            pid,
            reason: errno.desc().to_string(),
        }),
    }
}

#[cfg(windows)]
fn terminate(pid: i32) -> Result<()> {
    let output = std::process::Command::new("taskkill")
        .args(["/F", "/PID", &pid.to_string()])
        .output()
        .map_err(|e| CmdkitError::Terminate {
            pid,
            reason: format!("failed to run taskkill: {e}"),
        })?;
    if output.status.success() {
        info!(pid, "Terminated process with taskkill");
        return Ok(());
    }
    // taskkill exits with 128 when the PID does not exist.
    if output.status.code() == Some(128) {
        debug!(pid, "Process already exited");
        return Ok(());
    }
    Err(CmdkitError::Terminate {
        pid,
        reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
