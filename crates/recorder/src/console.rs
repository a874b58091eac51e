//! The page console and its interception seam.
//!
//! The console always forwards to its native sink; when a recorder tap is
//! installed, calls are captured first and then forwarded unmodified, so
//! whoever watches the native output sees exactly what they would have
//! seen without the tap.

use std::sync::{Arc, Mutex};

use logsieve_protocol::LogKind;
use tracing::{debug, error, info, warn};

use crate::recorder::Recorder;
use crate::value::PageValue;

/// Destination for console output.
pub trait ConsoleSink: Send + Sync {
    fn emit(&self, kind: LogKind, args: &[PageValue]);
}

/// The five console entry points of a page context.
pub struct Console {
    native: Arc<dyn ConsoleSink>,
    tap: Mutex<Option<Arc<Recorder>>>,
}

impl Console {
    pub fn new(native: Arc<dyn ConsoleSink>) -> Self {
        Self {
            native,
            tap: Mutex::new(None),
        }
    }

    pub fn log(&self, args: &[PageValue]) {
        self.dispatch(LogKind::Log, args);
    }

    pub fn info(&self, args: &[PageValue]) {
        self.dispatch(LogKind::Info, args);
    }

    pub fn warn(&self, args: &[PageValue]) {
        self.dispatch(LogKind::Warn, args);
    }

    pub fn error(&self, args: &[PageValue]) {
        self.dispatch(LogKind::Error, args);
    }

    pub fn debug(&self, args: &[PageValue]) {
        self.dispatch(LogKind::Debug, args);
    }

    fn dispatch(&self, kind: LogKind, args: &[PageValue]) {
        let tap = self.tap.lock().unwrap().clone();
        if let Some(recorder) = tap {
            recorder.capture(kind, args);
        }
        self.native.emit(kind, args);
    }

    /// Installs a capture tap. There is exactly one tap slot, so wrapping
    /// can never stack: installing over an existing tap replaces it.
    pub(crate) fn set_tap(&self, recorder: Arc<Recorder>) {
        *self.tap.lock().unwrap() = Some(recorder);
    }

    pub(crate) fn clear_tap(&self) {
        *self.tap.lock().unwrap() = None;
    }

    pub fn is_tapped(&self) -> bool {
        self.tap.lock().unwrap().is_some()
    }
}

/// Native sink that forwards console calls to `tracing`, the closest
/// thing this process has to a native console.
pub struct TracingSink;

impl ConsoleSink for TracingSink {
    fn emit(&self, kind: LogKind, args: &[PageValue]) {
        let line = args
            .iter()
            .map(|a| a.display_string().unwrap_or_else(|| "[Object]".into()))
            .collect::<Vec<_>>()
            .join(" ");
        match kind {
            LogKind::Log | LogKind::Debug => debug!(kind = kind.as_str(), "{line}"),
            LogKind::Info => info!(kind = kind.as_str(), "{line}"),
            LogKind::Warn => warn!(kind = kind.as_str(), "{line}"),
            LogKind::Error => error!(kind = kind.as_str(), "{line}"),
        }
    }
}
