//! # Abnormal Exit Hook (`common::process::hook`)
//!
//! File: lib/src/common/process/hook.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every `Launcher` holds an `ExitHook`, invoked with the full argument list
//! and the [`Termination`] details whenever a launched process exits with a
//! non-zero code or a signal. The default, [`DiagnosticHook`], prints one
//! timestamped line to stdout:
//!
//! ```text
//! [2024-05-01 13:37:00]The process exited abnormally: PID(4242) PARAMS(["make", "all"])
//! ```
//!
//! Any `Fn(&[String], &Termination) + Send + Sync` closure is also a hook:
//!
//! ```rust
//! use cmdkit::{Launcher, Termination};
//!
//! let launcher = Launcher::with_hook(|args: &[String], t: &Termination| {
//!     eprintln!("{:?} failed: {}", args, t);
//! });
//! # drop(launcher);
//! ```
//!
use super::Termination;
use chrono::{DateTime, Local};

/// Strategy invoked when a launched process terminates abnormally.
pub trait ExitHook: Send + Sync {
    fn on_abnormal_exit(&self, args: &[String], termination: &Termination);
}

impl<F> ExitHook for F
where
    F: Fn(&[String], &Termination) + Send + Sync,
{
    fn on_abnormal_exit(&self, args: &[String], termination: &Termination) {
        self(args, termination)
    }
}

/// Default hook: prints a timestamped diagnostic line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticHook;

impl ExitHook for DiagnosticHook {
    fn on_abnormal_exit(&self, args: &[String], termination: &Termination) {
        println!("{}", diagnostic_line(Local::now(), args, termination));
    }
}

fn diagnostic_line(now: DateTime<Local>, args: &[String], termination: &Termination) -> String {
    format!(
        "[{}]The process exited abnormally: PID({}) PARAMS({:?})",
        now.format("%Y-%m-%d %H:%M:%S"),
        termination.pid.unwrap_or(0),
        args
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_diagnostic_line_format() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 13, 37, 0).unwrap();
        let termination = Termination {
            pid: Some(4242),
            code: Some(2),
            signal: None,
        };
        let args = vec!["make".to_string(), "all".to_string()];
        assert_eq!(
            diagnostic_line(now, &args, &termination),
            r#"[2024-05-01 13:37:00]The process exited abnormally: PID(4242) PARAMS(["make", "all"])"#
        );
    }

    #[test]
    fn test_closure_is_a_hook() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let hook = move |args: &[String], t: &Termination| {
            recorded.lock().unwrap().push((args.to_vec(), t.code));
        };
        let termination = Termination {
            pid: None,
            code: Some(1),
            signal: None,
        };
        hook.on_abnormal_exit(&["false".to_string()], &termination);
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &[(vec!["false".to_string()], Some(1))]
        );
    }
}
