//! # cmdkit Tokenize Handler
//!
//! File: cli/src/commands/tokenize.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `cmdkit tokenize`, which prints the argument list the library
//! would hand to the OS for a command string. Each token is printed on its
//! own line in Rust debug quoting, so empty tokens and embedded quotes stay
//! visible.
//!
//! ## Usage
//!
//! ```bash
//! $ cmdkit tokenize 'tool -p "eee\"ddd" --level=3'
//! "tool"
//! "-p"
//! "eee\"ddd"
//! "--level"
//! "3"
//! ```
//!
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Tokenize Arguments (`TokenizeArgs`)
#[derive(Parser, Debug)]
#[command(about = "Split a command line into arguments and print one per line")]
pub struct TokenizeArgs {
    /// The command line to split. Quote it so your shell passes it as one argument.
    command: String,
}

pub async fn handle_tokenize(args: TokenizeArgs) -> Result<()> {
    let tokens = cmdkit::tokenize(&args.command);
    debug!(count = tokens.len(), "Tokenized command");
    for line in render_tokens(&tokens) {
        println!("{line}");
    }
    Ok(())
}

fn render_tokens(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|token| format!("{token:?}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_args_parsing() {
        let args = TokenizeArgs::try_parse_from(["tokenize", "ls -la"]).unwrap();
        assert_eq!(args.command, "ls -la");
        assert!(TokenizeArgs::try_parse_from(["tokenize"]).is_err());
    }

    #[test]
    fn test_render_tokens_quotes_each_token() {
        let tokens = vec!["a".to_string(), String::new(), "e\"d".to_string()];
        assert_eq!(render_tokens(&tokens), vec![r#""a""#, r#""""#, r#""e\"d""#]);
    }
}
