//! # Process Launcher (`common::process::launcher`)
//!
//! File: lib/src/common/process/launcher.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module turns an argument list into a running OS process and routes
//! its output to caller-supplied sinks.
//!
//! ## Architecture
//!
//! - **`ExecutionUnit`**: one not-yet-started invocation: program, arguments,
//!   optional working directory and extra environment, stdout/stderr sinks and
//!   an optional stdin source. Construction rejects an empty argument list or
//!   an empty program name. Sinks not supplied through [`OutputSinks`] default
//!   to this process's own stdout/stderr.
//! - **`Launcher`**: starts units. It owns the [`ExitHook`] called on abnormal
//!   exits.
//!   - `run`: start and wait. A non-zero exit fires the hook and is returned
//!     as [`CmdkitError::AbnormalExit`].
//!   - `output`: like `run`, but collects stdout/stderr in memory and reports
//!     the exit status instead of failing on it.
//!   - `spawn` / `spawn_with_input`: start and return at once. A background
//!     waiter fires the hook on abnormal exit and writes the error text to the
//!     unit's stderr sink.
//!   - `spawn_timed`: wrap both sinks in [`TimedSink`]s, spawn, sleep for the
//!     window, then return the handle and the two captured buffers.
//! - **`RunningProcess`**: handle to a background launch with a PID and an
//!   awaitable completion signal.
//!
//! Output is always piped: one tokio task per stream reads the pipe and writes
//! into the sink. A failing sink is logged and the pipe keeps draining, so a
//! broken sink never stalls the child.
//!
//! ## Usage
//!
//! ```no_run
//! use cmdkit::{CallbackSink, ExecutionUnit, Launcher, OutputSinks};
//!
//! # async fn example() -> cmdkit::Result<()> {
//! let sinks = OutputSinks::new().stdout(CallbackSink::new(|chunk: &[u8]| {
//!     print!("{}", String::from_utf8_lossy(chunk));
//!     Ok(())
//! }));
//! let unit = ExecutionUnit::build(vec!["cargo".into(), "--version".into()], sinks)?
//!     .current_dir("/tmp");
//! Launcher::new().run(unit).await?;
//! # Ok(())
//! # }
//! ```
//!
use super::{
    capture::{is_source_closed, CallbackSink, CapturedBuffer, TimedSink},
    hook::{DiagnosticHook, ExitHook},
    lifecycle::close_process_from_pid,
    tokenizer::tokenize,
    Termination,
};
use crate::core::error::{CmdkitError, Result};
use std::{
    fmt, io,
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    sync::Arc,
    time::Duration,
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    process::{Child, ChildStdin, Command},
    sync::watch,
    task::{self, JoinHandle},
};
use tracing::{debug, info, warn};

/// Bytes copied per read from a child's pipe.
const PUMP_CHUNK_SIZE: usize = 8 * 1024;

/// Output sink accepted by an [`ExecutionUnit`].
pub type BoxedSink = Box<dyn AsyncWrite + Send + Unpin>;
/// Input source accepted by an [`ExecutionUnit`].
pub type BoxedSource = Box<dyn AsyncRead + Send + Unpin>;

/// Optional stdout/stderr overrides for a new [`ExecutionUnit`].
#[derive(Default)]
pub struct OutputSinks {
    pub stdout: Option<BoxedSink>,
    pub stderr: Option<BoxedSink>,
}

impl OutputSinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(mut self, sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.stdout = Some(Box::new(sink));
        self
    }

    pub fn stderr(mut self, sink: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        self.stderr = Some(Box::new(sink));
        self
    }
}

impl fmt::Debug for OutputSinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSinks")
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}

/// A single, not-yet-started external process invocation.
pub struct ExecutionUnit {
    argv: Vec<String>,
    working_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
    stdout: BoxedSink,
    stderr: BoxedSink,
    stdin: Option<BoxedSource>,
}

impl ExecutionUnit {
    /// Builds a unit from a pre-split argument list; `argv[0]` is the program.
    ///
    /// # Errors
    ///
    /// [`CmdkitError::MalformedInvocation`] if `argv` is empty or `argv[0]` is empty.
    pub fn build(argv: Vec<String>, sinks: OutputSinks) -> Result<Self> {
        match argv.first() {
            None => {
                return Err(CmdkitError::MalformedInvocation(
                    "empty argument list".to_string(),
                ))
            }
            Some(program) if program.is_empty() => {
                return Err(CmdkitError::MalformedInvocation(
                    "empty program name".to_string(),
                ))
            }
            Some(_) => {}
        }
        Ok(Self {
            argv,
            working_dir: None,
            env: Vec::new(),
            stdout: sinks
                .stdout
                .unwrap_or_else(|| Box::new(tokio::io::stdout())),
            stderr: sinks
                .stderr
                .unwrap_or_else(|| Box::new(tokio::io::stderr())),
            stdin: None,
        })
    }

    /// Tokenizes `command` (see [`tokenize`]) and builds a unit from the result.
    pub fn from_command(command: &str, sinks: OutputSinks) -> Result<Self> {
        Self::build(tokenize(command), sinks)
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Runs the process in `dir` instead of the caller's current directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Adds an environment variable on top of the inherited environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Uses `source` as the process's stdin. Without a source stdin is empty.
    pub fn stdin(mut self, source: impl AsyncRead + Send + Unpin + 'static) -> Self {
        self.stdin = Some(Box::new(source));
        self
    }

    /// Wraps both sinks in [`TimedSink`]s with the given window and returns
    /// the handles to their captured bytes (stdout, stderr).
    pub fn capture_window(mut self, window: Duration) -> (Self, CapturedBuffer, CapturedBuffer) {
        let stdout = TimedSink::new(self.stdout, window);
        let stderr = TimedSink::new(self.stderr, window);
        let (out_buf, err_buf) = (stdout.buffer(), stderr.buffer());
        self.stdout = Box::new(stdout);
        self.stderr = Box::new(stderr);
        (self, out_buf, err_buf)
    }
}

impl fmt::Debug for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionUnit")
            .field("argv", &self.argv)
            .field("working_dir", &self.working_dir)
            .field("env", &self.env)
            .field("stdin", &self.stdin.is_some())
            .finish_non_exhaustive()
    }
}

/// Final state of a background launch.
#[derive(Debug, Clone)]
pub enum Completion {
    /// Exited with status zero.
    Succeeded(ExitStatus),
    /// Exited non-zero or was killed by a signal.
    Abnormal(Termination),
    /// Waiting on the child failed; the message describes why.
    WaitFailed(String),
}

impl Completion {
    pub fn is_success(&self) -> bool {
        matches!(self, Completion::Succeeded(_))
    }
}

/// Handle to a process started with [`Launcher::spawn`].
///
/// Returned as soon as the process is started; the background waiter may
/// still be running. Use [`wait`](Self::wait) to synchronise with it.
#[derive(Debug, Clone)]
pub struct RunningProcess {
    pid: Option<u32>,
    argv: Vec<String>,
    completion: watch::Receiver<Option<Completion>>,
}

impl RunningProcess {
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Completion state, or `None` while the waiter has not finished.
    pub fn try_completion(&self) -> Option<Completion> {
        self.completion.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.try_completion().is_none()
    }

    /// Waits for the background waiter to record the process's completion.
    pub async fn wait(&mut self) -> Completion {
        // An error here means the waiter is gone; the last value still tells the story.
        let _ = self.completion.wait_for(Option::is_some).await;
        self.completion.borrow().clone().unwrap_or_else(|| {
            Completion::WaitFailed("waiter task ended without reporting".to_string())
        })
    }

    /// Forcefully terminates the process by PID.
    pub fn kill(&self) -> Result<()> {
        match self.pid {
            Some(pid) => close_process_from_pid(pid as i32),
            None => Ok(()),
        }
    }
}

/// Result of [`Launcher::spawn_timed`].
#[derive(Debug)]
pub struct TimedRun {
    pub process: RunningProcess,
    /// Stdout produced within the window.
    pub stdout: CapturedBuffer,
    /// Stderr produced within the window.
    pub stderr: CapturedBuffer,
}

/// Result of [`Launcher::output`].
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Starts [`ExecutionUnit`]s and reports abnormal exits to its [`ExitHook`].
///
/// All methods must be called from within a tokio runtime.
#[derive(Clone)]
pub struct Launcher {
    hook: Arc<dyn ExitHook>,
}

impl Default for Launcher {
    fn default() -> Self {
        Self::with_hook(DiagnosticHook)
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher").finish_non_exhaustive()
    }
}

impl Launcher {
    /// A launcher using the default [`DiagnosticHook`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(hook: impl ExitHook + 'static) -> Self {
        Self {
            hook: Arc::new(hook),
        }
    }

    /// Starts `unit` and waits for it to exit.
    ///
    /// # Errors
    ///
    /// - [`CmdkitError::LaunchFailed`] if the program cannot be started.
    /// - [`CmdkitError::Wait`] if waiting on the child fails.
    /// - [`CmdkitError::AbnormalExit`] if it exits non-zero or by signal; the
    ///   exit hook has already been called.
    pub async fn run(&self, unit: ExecutionUnit) -> Result<ExitStatus> {
        let (pid, status) = self.execute(unit).await?;
        if status.success() {
            Ok(status)
        } else {
            Err(CmdkitError::AbnormalExit(Termination::from_status(
                pid, status,
            )))
        }
    }

    /// Runs `unit` with in-memory sinks and returns everything it printed.
    ///
    /// A non-zero exit is reported through [`CapturedOutput::status`] (after
    /// the hook fired) rather than as an error.
    pub async fn output(&self, mut unit: ExecutionUnit) -> Result<CapturedOutput> {
        let (stdout, stderr) = (CapturedBuffer::new(), CapturedBuffer::new());
        unit.stdout = Box::new(stdout.clone());
        unit.stderr = Box::new(stderr.clone());
        let (_, status) = self.execute(unit).await?;
        Ok(CapturedOutput {
            status,
            stdout: stdout.snapshot(),
            stderr: stderr.snapshot(),
        })
    }

    /// Tokenizes `command` and runs it with stdout routed to `callback`.
    pub async fn run_callback<F>(&self, command: &str, callback: F) -> Result<ExitStatus>
    where
        F: FnMut(&[u8]) -> io::Result<()> + Send + Unpin + 'static,
    {
        let sinks = OutputSinks::new().stdout(CallbackSink::new(callback));
        self.run(ExecutionUnit::from_command(command, sinks)?).await
    }

    /// Starts `unit` in the background. See [`RunningProcess`].
    ///
    /// # Errors
    ///
    /// [`CmdkitError::LaunchFailed`] if the program cannot be started; nothing
    /// is left running in that case.
    pub fn spawn(&self, unit: ExecutionUnit) -> Result<RunningProcess> {
        let started = start(unit)?;
        let pid = started.pid;
        let argv = started.argv.clone();
        let (tx, rx) = watch::channel(None);
        let hook = Arc::clone(&self.hook);

        task::spawn(async move {
            let argv = started.argv.clone();
            let (waited, stderr) = started.finish().await;
            let (completion, report) = match waited {
                Ok(status) if status.success() => (Completion::Succeeded(status), None),
                Ok(status) => {
                    let termination = Termination::from_status(pid, status);
                    warn!(pid = ?pid, program = %argv[0], %termination, "Process exited abnormally");
                    hook.on_abnormal_exit(&argv, &termination);
                    let text = termination.to_string();
                    (Completion::Abnormal(termination), Some(text))
                }
                Err(e) => {
                    warn!(pid = ?pid, program = %argv[0], error = %e, "Failed to wait for process");
                    (Completion::WaitFailed(e.to_string()), Some(e.to_string()))
                }
            };
            if let (Some(text), Some(mut sink)) = (report, stderr) {
                write_report(&mut sink, &text).await;
            }
            // The handle may have been dropped; the process still ran to completion.
            let _ = tx.send(Some(completion));
        });

        Ok(RunningProcess {
            pid,
            argv,
            completion: rx,
        })
    }

    /// Wires `source` as stdin, then behaves like [`spawn`](Self::spawn).
    pub fn spawn_with_input(
        &self,
        unit: ExecutionUnit,
        source: impl AsyncRead + Send + Unpin + 'static,
    ) -> Result<RunningProcess> {
        self.spawn(unit.stdin(source))
    }

    /// Tokenizes `command` and spawns it with stdout routed to `callback`.
    pub fn spawn_callback<F>(&self, command: &str, callback: F) -> Result<RunningProcess>
    where
        F: FnMut(&[u8]) -> io::Result<()> + Send + Unpin + 'static,
    {
        let sinks = OutputSinks::new().stdout(CallbackSink::new(callback));
        self.spawn(ExecutionUnit::from_command(command, sinks)?)
    }

    /// Spawns `unit` with both sinks wrapped in [`TimedSink`]s, then sleeps for
    /// exactly `window` before returning.
    ///
    /// The process keeps running afterwards; everything it prints still
    /// reaches the original sinks, but the returned buffers only hold what
    /// arrived within the window.
    pub async fn spawn_timed(&self, unit: ExecutionUnit, window: Duration) -> Result<TimedRun> {
        let (unit, stdout, stderr) = unit.capture_window(window);
        let process = self.spawn(unit)?;
        tokio::time::sleep(window).await;
        debug!(
            pid = ?process.pid(),
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "Capture window elapsed"
        );
        Ok(TimedRun {
            process,
            stdout,
            stderr,
        })
    }

    async fn execute(&self, unit: ExecutionUnit) -> Result<(Option<u32>, ExitStatus)> {
        let started = start(unit)?;
        let pid = started.pid;
        let argv = started.argv.clone();
        let (waited, _stderr) = started.finish().await;
        let status = waited.map_err(CmdkitError::Wait)?;
        if status.success() {
            debug!(pid = ?pid, program = %argv[0], "Process exited successfully");
        } else {
            let termination = Termination::from_status(pid, status);
            warn!(pid = ?pid, program = %argv[0], %termination, "Process exited abnormally");
            self.hook.on_abnormal_exit(&argv, &termination);
        }
        Ok((pid, status))
    }
}

/// A spawned child with its I/O pumps.
struct Started {
    child: Child,
    pid: Option<u32>,
    argv: Vec<String>,
    stdout_pump: JoinHandle<BoxedSink>,
    stderr_pump: JoinHandle<BoxedSink>,
    stdin_pump: Option<JoinHandle<()>>,
}

impl Started {
    /// Waits for the child and both output pumps. Returns the stderr sink so
    /// the caller can append a report to it.
    async fn finish(mut self) -> (io::Result<ExitStatus>, Option<BoxedSink>) {
        let waited = self.child.wait().await;
        if let Some(stdin_pump) = self.stdin_pump.take() {
            // The child is gone; a source that never closes must not keep the task alive.
            stdin_pump.abort();
        }
        if let Err(e) = self.stdout_pump.await {
            warn!(pid = ?self.pid, error = %e, "Stdout pump task failed");
        }
        let stderr = match self.stderr_pump.await {
            Ok(sink) => Some(sink),
            Err(e) => {
                warn!(pid = ?self.pid, error = %e, "Stderr pump task failed");
                None
            }
        };
        (waited, stderr)
    }
}

fn start(unit: ExecutionUnit) -> Result<Started> {
    let ExecutionUnit {
        argv,
        working_dir,
        env,
        stdout,
        stderr,
        stdin,
    } = unit;

    let mut command = Command::new(&argv[0]);
    command
        .args(&argv[1..])
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &working_dir {
        command.current_dir(dir);
    }
    for (key, value) in &env {
        command.env(key, value);
    }

    debug!(program = %argv[0], args = ?&argv[1..], working_dir = ?working_dir, "Spawning process");
    let mut child = command
        .spawn()
        .map_err(|source| CmdkitError::LaunchFailed {
            program: argv[0].clone(),
            source,
        })?;
    let pid = child.id();
    info!(pid = ?pid, program = %argv[0], "Process started");

    let stdout_pump = task::spawn(pump_output(child.stdout.take(), stdout, "stdout"));
    let stderr_pump = task::spawn(pump_output(child.stderr.take(), stderr, "stderr"));
    let stdin_pump = match (stdin, child.stdin.take()) {
        (Some(source), Some(pipe)) => Some(task::spawn(pump_input(source, pipe))),
        _ => None,
    };

    Ok(Started {
        child,
        pid,
        argv,
        stdout_pump,
        stderr_pump,
        stdin_pump,
    })
}

/// Copies a child pipe into `sink` until EOF and hands the sink back.
///
/// Sink errors are logged once and further chunks are still offered to the
/// sink; the pipe is drained either way.
async fn pump_output<R>(pipe: Option<R>, mut sink: BoxedSink, stream: &'static str) -> BoxedSink
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return sink;
    };
    let mut buf = vec![0u8; PUMP_CHUNK_SIZE];
    let mut sink_failed = false;
    loop {
        match pipe.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = sink.write_all(&buf[..n]).await {
                    if !sink_failed {
                        warn!(stream, error = %e, "Output sink rejected a write; still draining the pipe");
                    }
                    sink_failed = true;
                }
            }
            Err(e) => {
                warn!(stream, error = %e, "Error reading child output");
                break;
            }
        }
    }
    if let Err(e) = sink.flush().await {
        debug!(stream, error = %e, "Error flushing output sink");
    }
    sink
}

/// Feeds `source` into the child's stdin, closing the pipe when the source ends.
async fn pump_input(mut source: BoxedSource, mut pipe: ChildStdin) {
    let mut buf = vec![0u8; PUMP_CHUNK_SIZE];
    loop {
        match source.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = pipe.write_all(&buf[..n]).await {
                    if e.kind() == io::ErrorKind::BrokenPipe {
                        debug!("Child closed stdin");
                    } else {
                        warn!(error = %e, "Error writing to child stdin");
                    }
                    break;
                }
            }
            Err(e) if is_source_closed(&e) => {
                debug!("Stdin source closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Error reading stdin source");
                break;
            }
        }
    }
    if let Err(e) = pipe.shutdown().await {
        debug!(error = %e, "Error shutting down child stdin");
    }
}

async fn write_report(sink: &mut BoxedSink, text: &str) {
    if let Err(e) = sink.write_all(text.as_bytes()).await {
        warn!(error = %e, "Failed to write exit report to stderr sink");
        return;
    }
    if let Err(e) = sink.flush().await {
        debug!(error = %e, "Error flushing stderr sink");
    }
}
