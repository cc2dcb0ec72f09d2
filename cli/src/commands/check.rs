//! # cmdkit Check Handler
//!
//! File: cli/src/commands/check.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `cmdkit check <KIND> <VALUE>`, a command-line front end to the
//! library's text validators. It prints `valid` and exits 0, or prints
//! `invalid` and exits 1.
//!
//! ## Usage
//!
//! ```bash
//! cmdkit check email someone@example.com
//! cmdkit check url "https://example.com/docs"
//! cmdkit check single-line "$(cat message.txt)"
//! ```
//!
use crate::core::error::{CliError, Result};
use clap::{Parser, ValueEnum};
use cmdkit::common::text;
use tracing::debug;

/// The validator to apply.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Loose e-mail address check.
    Email,
    /// Stricter RFC 2822-style e-mail check.
    EmailRfc,
    /// ftp/http/https link.
    Url,
    /// Word characters and Han ideographs only.
    Username,
    /// No line breaks.
    SingleLine,
    /// At least one line break.
    MultiLine,
}

impl CheckKind {
    fn matches(self, value: &str) -> bool {
        match self {
            CheckKind::Email => text::is_email(value),
            CheckKind::EmailRfc => text::is_email_rfc(value),
            CheckKind::Url => text::is_url(value),
            CheckKind::Username => text::is_username(value),
            CheckKind::SingleLine => text::is_single_line_text(value),
            CheckKind::MultiLine => text::is_multi_line_text(value),
        }
    }

    fn label(self) -> &'static str {
        match self {
            CheckKind::Email => "email",
            CheckKind::EmailRfc => "email (RFC)",
            CheckKind::Url => "URL",
            CheckKind::Username => "username",
            CheckKind::SingleLine => "single-line text",
            CheckKind::MultiLine => "multi-line text",
        }
    }
}

/// # Check Arguments (`CheckArgs`)
#[derive(Parser, Debug)]
#[command(about = "Validate a value: prints `valid` (exit 0) or `invalid` (exit 1)")]
pub struct CheckArgs {
    /// Which validator to run.
    #[arg(value_enum)]
    kind: CheckKind,
    /// The value to validate.
    value: String,
}

pub async fn handle_check(args: CheckArgs) -> Result<()> {
    let valid = args.kind.matches(&args.value);
    debug!(kind = ?args.kind, valid, "Validated value");
    if valid {
        println!("valid");
        Ok(())
    } else {
        println!("invalid");
        Err(CliError::Validation {
            kind: args.kind.label().to_string(),
            value: args.value,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_args_parsing() {
        let args = CheckArgs::try_parse_from(["check", "email-rfc", "a@b.co"]).unwrap();
        assert_eq!(args.kind, CheckKind::EmailRfc);
        assert_eq!(args.value, "a@b.co");

        let args = CheckArgs::try_parse_from(["check", "single-line", "x"]).unwrap();
        assert_eq!(args.kind, CheckKind::SingleLine);

        assert!(CheckArgs::try_parse_from(["check", "phone", "123"]).is_err());
    }

    #[test]
    fn test_kind_dispatch() {
        assert!(CheckKind::Email.matches("someone@example.com"));
        assert!(!CheckKind::Url.matches("example.com"));
        assert!(CheckKind::MultiLine.matches("a\nb"));
        assert!(!CheckKind::Username.matches("bad name"));
    }

    #[tokio::test]
    async fn test_handle_check_reports_invalid_value() {
        let args = CheckArgs::try_parse_from(["check", "email", "nobody"]).unwrap();
        let err = handle_check(args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::Validation { .. })
        ));
    }
}
