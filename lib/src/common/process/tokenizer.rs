//! # Command-Line Tokenizer (`common::process::tokenizer`)
//!
//! File: lib/src/common/process/tokenizer.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Splits a single command-line string into an argument list without invoking
//! a shell. The grammar is deliberately tiny:
//!
//! - Outside quotes, a space or `=` ends the current token. Consecutive
//!   delimiters produce empty tokens.
//! - `"` opens and closes a quoted region; inside it spaces and `=` are
//!   ordinary characters.
//! - Inside quotes, `\"` produces a literal `"`. Any other backslash is kept.
//! - After splitting, `{%NAME%}` and then `{$NAME}` placeholders in each token
//!   are replaced with the value of environment variable `NAME` (empty when unset).
//!
//! Placeholders are expanded per token, so a placeholder split across two
//! tokens is never joined back together.
//!
//! ## Usage
//!
//! ```rust
//! use cmdkit::tokenize;
//!
//! let args = tokenize(r#"tower.exe -c tower.yaml -p "eee\"ddd" -t aaaa"#);
//! assert_eq!(args, vec!["tower.exe", "-c", "tower.yaml", "-p", "eee\"ddd", "-t", "aaaa"]);
//! ```
//!
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

const SPACE: char = ' ';
const EQUAL: char = '=';
const QUOTE: char = '"';
const BACKSLASH: char = '\\';

/// `{%NAME%}` placeholders.
static WINDOWS_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{%([a-zA-Z0-9_]+)%\}").expect("windows placeholder pattern is valid")
});

/// `{$NAME}` placeholders.
static POSIX_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\$([a-zA-Z0-9_]+)\}").expect("posix placeholder pattern is valid")
});

/// Tokenizes `command`, expanding placeholders from the process environment.
pub fn tokenize(command: &str) -> Vec<String> {
    tokenize_with(command, |name| std::env::var(name).ok())
}

/// Tokenizes `command`, resolving placeholders through `lookup`.
///
/// `lookup` receives the bare variable name (`HOME` for both `{$HOME}` and
/// `{%HOME%}`); returning `None` substitutes an empty string.
pub fn tokenize_with<F>(command: &str, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut escaped = false;
    let mut chars = command.chars().peekable();

    while let Some(ch) = chars.next() {
        if !in_quote {
            if ch == SPACE || ch == EQUAL {
                tokens.push(std::mem::take(&mut current));
                continue;
            }
            if ch == QUOTE {
                in_quote = true;
                continue;
            }
        } else {
            if !escaped && ch == QUOTE {
                in_quote = false;
                continue;
            }
            if !escaped && ch == BACKSLASH && chars.peek() == Some(&QUOTE) {
                escaped = true;
                continue;
            }
            escaped = false;
        }
        current.push(ch);
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    let tokens: Vec<String> = tokens
        .into_iter()
        .map(|token| expand_placeholders(&token, &lookup))
        .collect();
    trace!(?tokens, "Tokenized command line");
    tokens
}

fn expand_placeholders<F>(token: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let resolve = |caps: &Captures| lookup(&caps[1]).unwrap_or_default();
    let windows = WINDOWS_PLACEHOLDER.replace_all(token, resolve);
    POSIX_PLACEHOLDER
        .replace_all(&windows, resolve)
        .into_owned()
}
