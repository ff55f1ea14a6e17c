// src/internal/debug/buffer.rs

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::internal::error::LogError;
use crate::internal::router::{Context, Dispatch, LogRouter};

use super::redact::redact_bot_token;

/// Template that logs the captured text as-is.
pub const DEFAULT_TEMPLATE: &str = "%s";

const INITIAL_CAPACITY: usize = 8 * 1024;

type Slot = Arc<Mutex<Option<Cursor<Vec<u8>>>>>;

/// Handle to the in-memory debug stream.
///
/// Clones write into the same stream. Once the owning [`DebugBuffer`] is
/// finalized or discarded the stream is closed and every I/O call on a
/// remaining handle fails.
#[derive(Clone)]
pub struct DebugStream {
    slot: Slot,
}

impl DebugStream {
    fn open() -> Option<Self> {
        let mut bytes = Vec::new();
        if let Err(e) = bytes.try_reserve(INITIAL_CAPACITY) {
            tracing::warn!("debug stream unavailable: {}", e);
            return None;
        }

        Some(Self {
            slot: Arc::new(Mutex::new(Some(Cursor::new(bytes)))),
        })
    }

    pub fn is_open(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Whether both handles refer to the same underlying stream.
    pub fn same_stream(&self, other: &DebugStream) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }

    /// Close the stream and hand back everything written to it.
    fn close(&self) -> Option<Vec<u8>> {
        self.slot.lock().take().map(Cursor::into_inner)
    }

    fn with_cursor<T>(
        &self,
        f: impl FnOnce(&mut Cursor<Vec<u8>>) -> io::Result<T>,
    ) -> io::Result<T> {
        match self.slot.lock().as_mut() {
            Some(cursor) => f(cursor),
            None => Err(LogError::StreamClosed.into()),
        }
    }
}

impl Write for DebugStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_cursor(|c| c.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_cursor(|c| c.flush())
    }
}

impl Read for DebugStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.with_cursor(|c| c.read(buf))
    }
}

impl Seek for DebugStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.with_cursor(|c| c.seek(pos))
    }
}

/// Captures verbose request/response traces and flushes them to the debug
/// log, with bot tokens redacted.
#[derive(Default)]
pub struct DebugBuffer {
    active: Mutex<Option<DebugStream>>,
    keep_token: AtomicBool,
    always_log_request_and_response: AtomicBool,
}

impl DebugBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redaction(self, enabled: bool) -> Self {
        self.set_redaction(enabled);
        self
    }

    pub fn with_always_log_request_and_response(self, enabled: bool) -> Self {
        self.set_always_log_request_and_response(enabled);
        self
    }

    pub fn redaction_enabled(&self) -> bool {
        !self.keep_token.load(Ordering::Relaxed)
    }

    pub fn set_redaction(&self, enabled: bool) {
        self.keep_token.store(!enabled, Ordering::Relaxed);
    }

    pub fn always_log_request_and_response(&self) -> bool {
        self.always_log_request_and_response.load(Ordering::Relaxed)
    }

    pub fn set_always_log_request_and_response(&self, enabled: bool) {
        self.always_log_request_and_response
            .store(enabled, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Return the active stream, opening a fresh one if none is active.
    ///
    /// `None` means no stream could be allocated.
    pub fn acquire(&self) -> Option<DebugStream> {
        let mut active = self.active.lock();
        if let Some(stream) = active.as_ref() {
            return Some(stream.clone());
        }

        let stream = DebugStream::open()?;
        *active = Some(stream.clone());
        Some(stream)
    }

    /// Log the captured text at debug level and close the stream.
    ///
    /// `template` receives the text at its first `%s`. Returns `None` when
    /// no stream was active.
    pub fn finalize(&self, router: &LogRouter, template: &str) -> Option<Dispatch> {
        let bytes = self.take()?;
        let contents = String::from_utf8_lossy(&bytes);

        let contents = if self.redaction_enabled() {
            redact_bot_token(&contents).into_owned()
        } else {
            contents.into_owned()
        };

        let message = render_template(template, &contents);
        Some(router.debug(&message, &Context::new()))
    }

    /// Close the stream without logging it. Returns whether one was active.
    pub fn discard(&self) -> bool {
        self.take().is_some()
    }

    /// Close out the capture for one API request.
    ///
    /// Failed requests are always logged; successful ones only when
    /// `always_log_request_and_response` is set.
    pub fn complete_request(
        &self,
        router: &LogRouter,
        ok: bool,
        template: &str,
    ) -> Option<Dispatch> {
        if !ok || self.always_log_request_and_response() {
            self.finalize(router, template)
        } else {
            self.discard();
            None
        }
    }

    fn take(&self) -> Option<Vec<u8>> {
        let stream = self.active.lock().take()?;
        Some(stream.close().unwrap_or_default())
    }
}

/// Substitute `contents` at the first `%s` in `template`. `%%` renders a
/// single `%`; any other `%` sequence is kept verbatim.
pub fn render_template(template: &str, contents: &str) -> String {
    let mut out = String::with_capacity(template.len() + contents.len());
    let mut substituted = false;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s') if !substituted => {
                chars.next();
                out.push_str(contents);
                substituted = true;
            }
            _ => out.push('%'),
        }
    }

    out
}
