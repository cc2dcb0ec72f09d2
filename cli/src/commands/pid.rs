//! # cmdkit PID Handler
//!
//! File: cli/src/commands/pid.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Implements the `cmdkit pid` command group:
//! - `write [PATH]`: write this process's PID to PATH
//! - `kill [PATH]`: read the PID in PATH and forcefully terminate it
//! - `kill-pid <PID>`: forcefully terminate a PID directly
//!
//! When PATH is omitted, `pid.file` from the configuration is used. A missing
//! or corrupt PID file is not an error, and neither is a PID whose process has
//! already exited.
//!
//! ## Usage
//!
//! ```bash
//! cmdkit pid write /tmp/worker.pid
//! cmdkit pid kill /tmp/worker.pid
//! cmdkit pid kill-pid 4242
//! ```
//!
use crate::core::{
    config,
    error::{CliError, Result},
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// # PID Command Group Arguments (`PidArgs`)
#[derive(Parser, Debug)]
#[command(about = "Write PID files and terminate processes by PID")]
pub struct PidArgs {
    #[command(subcommand)]
    command: PidCommand,
}

#[derive(Subcommand, Debug)]
enum PidCommand {
    /// Write this process's PID to PATH (default: `pid.file`).
    Write { path: Option<PathBuf> },
    /// Terminate the process whose PID is stored in PATH (default: `pid.file`).
    Kill { path: Option<PathBuf> },
    /// Terminate the process with the given PID.
    KillPid { pid: i32 },
}

pub async fn handle_pid(args: PidArgs) -> Result<()> {
    match args.command {
        PidCommand::Write { path } => {
            let path = resolve_pid_path(path)?;
            cmdkit::write_pid_file(&path)?;
            println!("Wrote PID {} to {}", std::process::id(), path.display());
        }
        PidCommand::Kill { path } => {
            let path = resolve_pid_path(path)?;
            match cmdkit::read_pid_file(&path)? {
                Some(pid) => {
                    cmdkit::close_process_from_pid(pid)
                        .with_context(|| format!("Failed to terminate PID {pid} from {}", path.display()))?;
                    println!("Closed process {pid}");
                }
                None => info!("No usable PID in {}; nothing to close", path.display()),
            }
        }
        PidCommand::KillPid { pid } => {
            cmdkit::close_process_from_pid(pid)
                .with_context(|| format!("Failed to terminate PID {pid}"))?;
            println!("Closed process {pid}");
        }
    }
    Ok(())
}

fn resolve_pid_path(path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = path {
        return Ok(path);
    }
    let cfg = config::load_config().context("Failed to load configuration")?;
    cfg.pid.file.map(PathBuf::from).ok_or_else(|| {
        CliError::ArgumentParsing(
            "no PID file given and `pid.file` is not configured".to_string(),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_args_parsing() {
        let args = PidArgs::try_parse_from(["pid", "write", "/tmp/a.pid"]).unwrap();
        assert!(matches!(
            args.command,
            PidCommand::Write { path: Some(ref p) } if p == &PathBuf::from("/tmp/a.pid")
        ));

        let args = PidArgs::try_parse_from(["pid", "kill"]).unwrap();
        assert!(matches!(args.command, PidCommand::Kill { path: None }));

        let args = PidArgs::try_parse_from(["pid", "kill-pid", "4242"]).unwrap();
        assert!(matches!(args.command, PidCommand::KillPid { pid: 4242 }));

        assert!(PidArgs::try_parse_from(["pid", "kill-pid", "abc"]).is_err());
    }

    #[test]
    fn test_explicit_path_skips_configuration() {
        let path = resolve_pid_path(Some(PathBuf::from("/tmp/explicit.pid"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.pid"));
    }
}
