//! # Output Capture Adapters (`common::process::capture`)
//!
//! File: lib/src/common/process/capture.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Small adapters that plug into an `ExecutionUnit`'s stdio:
//!
//! - **`CallbackSink`**: forwards every write to a closure. Usable both as a
//!   blocking `std::io::Write` and as a `tokio::io::AsyncWrite`.
//! - **`ChannelSender` / `ChannelSource`**: a rendezvous channel. The producer
//!   hands over one chunk at a time and waits until the reader has taken it;
//!   the reader side is an `AsyncRead` suitable as a child's stdin.
//! - **`TimedSink`**: forwards everything to an inner writer and keeps a copy
//!   of only the writes made within a fixed window after the sink was created.
//! - **`CapturedBuffer`**: the shared, cloneable byte store behind `TimedSink`
//!   (and the in-memory sinks used by `Launcher::output`).
//!
//! ## Usage
//!
//! ```rust
//! use cmdkit::{channel_source, CallbackSink};
//! use std::io::Write;
//!
//! let mut lines = Vec::new();
//! let mut sink = CallbackSink::new(|chunk: &[u8]| {
//!     lines.push(String::from_utf8_lossy(chunk).into_owned());
//!     Ok(())
//! });
//! sink.write_all(b"hello").unwrap();
//! drop(sink);
//! assert_eq!(lines, vec!["hello"]);
//!
//! let (sender, source) = channel_source();
//! # drop((sender, source));
//! ```
//!
use crate::core::error::{CmdkitError, Result};
use std::{
    fmt, io,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    task::{ready, Context, Poll},
    time::Duration,
};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    sync::{mpsc, oneshot},
    time::Instant,
};
use tracing::debug;

// --- CallbackSink ---

/// A sink that hands every payload to a callback.
///
/// The payload length is always reported as written, whatever the callback
/// returns; see [`CallbackSink::write_payload`]. Through the `Write` /
/// `AsyncWrite` impls a callback error is surfaced as the write's error.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    /// Invokes the callback with `payload`, returning the full payload length
    /// together with the callback's outcome.
    pub fn write_payload(&mut self, payload: &[u8]) -> (usize, io::Result<()>) {
        let outcome = (self.callback)(payload);
        (payload.len(), outcome)
    }

    /// String form of [`write_payload`](Self::write_payload).
    pub fn write_str_payload(&mut self, payload: &str) -> (usize, io::Result<()>) {
        self.write_payload(payload.as_bytes())
    }
}

impl<F> fmt::Debug for CallbackSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSink").finish_non_exhaustive()
    }
}

impl<F> io::Write for CallbackSink<F>
where
    F: FnMut(&[u8]) -> io::Result<()>,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let (written, outcome) = self.write_payload(buf);
        outcome.map(|()| written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<F> AsyncWrite for CallbackSink<F>
where
    F: FnMut(&[u8]) -> io::Result<()> + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let (written, outcome) = self.get_mut().write_payload(buf);
        Poll::Ready(outcome.map(|()| written))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

// --- ChannelSource ---

/// One chunk in flight plus the acknowledgement the reader fires on receipt.
struct Handoff {
    chunk: Vec<u8>,
    taken: oneshot::Sender<()>,
}

/// Creates a connected sender/source pair.
pub fn channel_source() -> (ChannelSender, ChannelSource) {
    let (tx, rx) = mpsc::channel(1);
    (
        ChannelSender { tx },
        ChannelSource {
            rx,
            pending: Vec::new(),
            offset: 0,
        },
    )
}

/// Producer half of the rendezvous channel.
///
/// Closing consumes the sender, so a send after close cannot be written.
pub struct ChannelSender {
    tx: mpsc::Sender<Handoff>,
}

impl fmt::Debug for ChannelSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSender")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl ChannelSender {
    /// Hands `bytes` to the reader and waits until it has been taken.
    ///
    /// Waits forever if nobody reads. Fails with
    /// [`CmdkitError::SourceClosed`] if the source has been dropped.
    pub async fn send(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let (taken, receipt) = oneshot::channel();
        self.tx
            .send(Handoff {
                chunk: bytes.into(),
                taken,
            })
            .await
            .map_err(|_| CmdkitError::SourceClosed)?;
        receipt.await.map_err(|_| CmdkitError::SourceClosed)
    }

    pub async fn send_str(&mut self, text: &str) -> Result<()> {
        self.send(text.as_bytes()).await
    }

    /// Blocking form of [`send`](Self::send) for producers running outside
    /// the async runtime. Panics if called from within an async context.
    pub fn blocking_send(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        let (taken, receipt) = oneshot::channel();
        self.tx
            .blocking_send(Handoff {
                chunk: bytes.into(),
                taken,
            })
            .map_err(|_| CmdkitError::SourceClosed)?;
        receipt.blocking_recv().map_err(|_| CmdkitError::SourceClosed)
    }

    /// Closes the channel. A reader waiting for data wakes with the
    /// closed-source error.
    pub fn close(self) {
        debug!("Closing channel source");
    }
}

/// Consumer half of the rendezvous channel, readable as an `AsyncRead`.
///
/// A chunk larger than the caller's buffer is served across several reads.
/// Once the sender is closed and no data remains, every read fails with an
/// `io::Error` wrapping [`CmdkitError::SourceClosed`] (see [`is_source_closed`]).
pub struct ChannelSource {
    rx: mpsc::Receiver<Handoff>,
    pending: Vec<u8>,
    offset: usize,
}

impl fmt::Debug for ChannelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSource")
            .field("pending", &(self.pending.len() - self.offset))
            .finish()
    }
}

impl AsyncRead for ChannelSource {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if buf.remaining() == 0 {
            return Poll::Ready(Ok(()));
        }
        loop {
            if this.offset < this.pending.len() {
                let available = &this.pending[this.offset..];
                let n = available.len().min(buf.remaining());
                buf.put_slice(&available[..n]);
                this.offset += n;
                return Poll::Ready(Ok(()));
            }
            match ready!(this.rx.poll_recv(cx)) {
                Some(handoff) => {
                    // The producer may have stopped waiting; nothing to do then.
                    let _ = handoff.taken.send(());
                    this.pending = handoff.chunk;
                    this.offset = 0;
                }
                None => return Poll::Ready(Err(source_closed_error())),
            }
        }
    }
}

fn source_closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, CmdkitError::SourceClosed)
}

/// Returns `true` if `err` is the closed-source error produced by [`ChannelSource`].
pub fn is_source_closed(err: &io::Error) -> bool {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<CmdkitError>())
        .is_some_and(|inner| matches!(inner, CmdkitError::SourceClosed))
}

// --- CapturedBuffer / TimedSink ---

/// Shared, growable byte store. Clones refer to the same bytes.
///
/// Also usable directly as an `AsyncWrite` that appends everything it receives.
#[derive(Clone, Default)]
pub struct CapturedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CapturedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the bytes captured so far. May still grow afterwards.
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn append(&self, bytes: &[u8]) {
        self.lock().extend_from_slice(bytes);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CapturedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedBuffer")
            .field("len", &self.len())
            .finish()
    }
}

impl AsyncWrite for CapturedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.append(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Mirrors writes to an inner writer and retains a copy of the ones that
/// happen within `window` of the sink's creation.
///
/// Only bytes the inner writer accepted are retained, so the captured bytes
/// are always a prefix of what went through the sink.
pub struct TimedSink<W> {
    inner: W,
    started: Instant,
    window: Duration,
    captured: CapturedBuffer,
}

impl<W> TimedSink<W> {
    pub fn new(inner: W, window: Duration) -> Self {
        Self {
            inner,
            started: Instant::now(),
            window,
            captured: CapturedBuffer::new(),
        }
    }

    /// Handle to the captured bytes; stays valid after the sink is moved into a pump.
    pub fn buffer(&self) -> CapturedBuffer {
        self.captured.clone()
    }

    pub fn writer(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn within_window(&self) -> bool {
        self.started.elapsed() < self.window
    }
}

impl<W> fmt::Debug for TimedSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedSink")
            .field("window", &self.window)
            .field("captured", &self.captured)
            .finish_non_exhaustive()
    }
}

impl<W> AsyncWrite for TimedSink<W>
where
    W: AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        let capture = this.within_window();
        let written = ready!(Pin::new(&mut this.inner).poll_write(cx, buf))?;
        if capture {
            this.captured.append(&buf[..written]);
        }
        Poll::Ready(Ok(written))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
