//! # cmdkit Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This file is the entry point for the `cmdkit` CLI, a thin command-line
//! surface over the `cmdkit` library. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`tokenize`, `run`, `pid`, `check`) is a variant in the `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - All errors are propagated to this level, printed, and turned into exit status 1
//!
//! ## Examples
//!
//! ```bash
//! # Show how a command line is split
//! cmdkit tokenize 'tool -c "my file.yaml" --level=3'
//!
//! # Run a command, keeping only its first 500ms of output as a summary
//! cmdkit -v run --timed --window-ms 500 'ping -c 3 localhost'
//!
//! # Validate a value
//! cmdkit check email someone@example.com
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handles specific command logic (tokenize, run, pid, check)
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cmdkit",
    about = "cmdkit: command-line tokenizing, process launching and PID lifecycle",
    long_about = "Tokenize command lines, run external programs with bounded-time output capture,\n\
                  manage PID files and validate common text formats.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "t")]
    Tokenize(commands::tokenize::TokenizeArgs),
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    Pid(commands::pid::PidArgs),
    #[command(alias = "c")]
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Tokenize(args) => commands::tokenize::handle_tokenize(args).await,
        Commands::Run(args) => commands::run::handle_run(args).await,
        Commands::Pid(args) => commands::pid::handle_pid(args).await,
        Commands::Check(args) => commands::check::handle_check(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
