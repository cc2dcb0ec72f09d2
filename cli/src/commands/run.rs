//! # cmdkit Run Handler
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Implements `cmdkit run`, which tokenizes a command string and launches it
//! without a shell. The child's stdout and stderr stream straight through to
//! the terminal.
//!
//! ## Architecture
//!
//! 1. Load the configuration for the default working directory, extra
//!    environment variables and capture window.
//! 2. Build an `ExecutionUnit` from the command string; `--dir` overrides the
//!    configured working directory.
//! 3. Without `--timed`, run the unit to completion.
//! 4. With `--timed`, spawn it with a capture window, report how many bytes
//!    arrived within the window on stderr, then wait for the process to exit.
//!
//! A non-zero exit becomes `CliError::ExternalCommand`, so `cmdkit` itself
//! exits with status 1. The launcher's default hook has already printed its
//! diagnostic line by then.
//!
//! ## Usage
//!
//! ```bash
//! cmdkit run 'cargo build --release'
//! cmdkit run --dir ./service 'make test'
//! cmdkit run --timed --window-ms 500 'ping -c 3 localhost'
//! ```
//!
use crate::core::{
    config,
    error::{CliError, Result},
};
use anyhow::{anyhow, Context};
use clap::Parser;
use cmdkit::{CmdkitError, Completion, ExecutionUnit, Launcher, OutputSinks};
use std::{path::PathBuf, time::Duration};
use tracing::{debug, info};

/// # Run Arguments (`RunArgs`)
#[derive(Parser, Debug)]
#[command(
    about = "Run a command string without a shell",
    long_about = "Tokenizes COMMAND (spaces and '=' split, double quotes group, {$VAR} and {%VAR%} expand)\n\
                  and runs it. With --timed, also reports how much output arrived within the capture window."
)]
pub struct RunArgs {
    /// Working directory for the command (overrides `process.working_dir`).
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Report the output captured within the first window of the run.
    #[arg(short, long)]
    timed: bool,

    /// Capture window in milliseconds (overrides `process.capture_window_ms`).
    #[arg(long, requires = "timed", value_parser = clap::value_parser!(u64).range(1..))]
    window_ms: Option<u64>,

    /// The command line to run. Quote it so your shell passes it as one argument.
    command: String,
}

pub async fn handle_run(args: RunArgs) -> Result<()> {
    info!("Handling run command with args: {:?}", args);
    let cfg = config::load_config().context("Failed to load configuration")?;

    let mut unit = ExecutionUnit::from_command(&args.command, OutputSinks::default())
        .with_context(|| format!("Cannot run '{}'", args.command))?;
    if let Some(dir) = args
        .dir
        .clone()
        .or_else(|| cfg.process.working_dir.as_ref().map(PathBuf::from))
    {
        debug!("Using working directory: {}", dir.display());
        unit = unit.current_dir(dir);
    }
    for (key, value) in &cfg.process.env {
        unit = unit.env(key, value);
    }

    let launcher = Launcher::new();
    if args.timed {
        let window = args
            .window_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| cfg.process.capture_window());
        run_timed(&launcher, unit, window, &args.command).await
    } else {
        match launcher.run(unit).await {
            Ok(_) => Ok(()),
            Err(CmdkitError::AbnormalExit(termination)) => Err(CliError::ExternalCommand {
                cmd: args.command,
                status: termination.to_string(),
            }
            .into()),
            Err(e) => Err(e).with_context(|| format!("Failed to run '{}'", args.command)),
        }
    }
}

async fn run_timed(
    launcher: &Launcher,
    unit: ExecutionUnit,
    window: Duration,
    command: &str,
) -> Result<()> {
    let mut timed = launcher
        .spawn_timed(unit, window)
        .await
        .with_context(|| format!("Failed to start '{command}'"))?;
    eprintln!(
        "{}",
        window_summary(window, timed.stdout.len(), timed.stderr.len())
    );

    match timed.process.wait().await {
        Completion::Succeeded(_) => Ok(()),
        Completion::Abnormal(termination) => Err(CliError::ExternalCommand {
            cmd: command.to_string(),
            status: termination.to_string(),
        }
        .into()),
        Completion::WaitFailed(reason) => Err(anyhow!("Failed to wait for '{command}': {reason}")),
    }
}

fn window_summary(window: Duration, stdout_bytes: usize, stderr_bytes: usize) -> String {
    format!(
        "Captured {stdout_bytes} stdout bytes and {stderr_bytes} stderr bytes within {}ms",
        window.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_parsing() {
        let args = RunArgs::try_parse_from(["run", "--dir", "/tmp", "ls -la"]).unwrap();
        assert_eq!(args.dir, Some(PathBuf::from("/tmp")));
        assert!(!args.timed);
        assert_eq!(args.command, "ls -la");

        let args =
            RunArgs::try_parse_from(["run", "--timed", "--window-ms", "250", "ping localhost"])
                .unwrap();
        assert!(args.timed);
        assert_eq!(args.window_ms, Some(250));
    }

    #[test]
    fn test_run_args_window_requires_timed() {
        assert!(RunArgs::try_parse_from(["run", "--window-ms", "250", "ls"]).is_err());
    }

    #[test]
    fn test_run_args_rejects_zero_window() {
        assert!(RunArgs::try_parse_from(["run", "--timed", "--window-ms", "0", "ls"]).is_err());
    }

    #[test]
    fn test_window_summary() {
        assert_eq!(
            window_summary(Duration::from_millis(500), 12, 0),
            "Captured 12 stdout bytes and 0 stderr bytes within 500ms"
        );
    }
}
