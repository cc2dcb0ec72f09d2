//! # cmdkit CLI Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! The CLI layers its own error enum over the library's `CmdkitError`:
//! - `CliError`: failures that only make sense at the command-line surface
//!   (configuration, a failed child command, a rejected value)
//! - `Result<T>`: an alias for `anyhow::Result<T>` so handlers can attach
//!   context with `.context(...)` and bubble everything up to `main`
//!
//! Library errors pass through unchanged via `anyhow`'s blanket conversion.
//!
//! ## Examples
//!
//! ```rust
//! if window_ms == 0 {
//!     return Err(CliError::Config("capture_window_ms must be greater than 0".into()).into());
//! }
//!
//! let cfg = config::load_config().context("Failed to load configuration")?;
//! ```
//!
use thiserror::Error;

/// Errors raised by the `cmdkit` command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External command failed: {cmd}, Status: {status}")]
    ExternalCommand { cmd: String, status: String },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),

    #[error("Invalid {kind}: '{value}'")]
    Validation { kind: String, value: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = CliError::Config("capture_window_ms must be greater than 0".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: capture_window_ms must be greater than 0"
        );

        let external = CliError::ExternalCommand {
            cmd: "make all".into(),
            status: "exit status 2".into(),
        };
        assert_eq!(
            external.to_string(),
            "External command failed: make all, Status: exit status 2"
        );

        let invalid = CliError::Validation {
            kind: "email".into(),
            value: "nobody".into(),
        };
        assert_eq!(invalid.to_string(), "Invalid email: 'nobody'");
    }

    #[test]
    fn test_library_errors_convert_into_anyhow() {
        fn fails() -> Result<()> {
            Err(cmdkit::CmdkitError::MalformedInvocation("empty argument list".into()))?
        }
        let err = fails().unwrap_err();
        assert!(err.downcast_ref::<cmdkit::CmdkitError>().is_some());
    }
}
