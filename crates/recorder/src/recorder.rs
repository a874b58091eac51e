//! The recorder: capture, dump, reset, and the boundary service loop.

use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use logsieve_protocol::entry::ORIGIN_CONSOLE;
use logsieve_protocol::{LogEntry, LogKind, Signal, constants::MAX_LOGS};

use crate::buffer::LogBuffer;
use crate::channel::{DataSlot, EMPTY_SLOT, SignalBus};
use crate::snapshot::deep_copy;
use crate::value::PageValue;

/// Observes console calls and keeps the bounded entry buffer.
///
/// One instance per install; a fresh install starts with an empty buffer.
#[derive(Debug)]
pub struct Recorder {
    buffer: Mutex<LogBuffer>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOGS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(LogBuffer::new(capacity)),
        }
    }

    /// Captures one console call. Never panics: every argument that
    /// resists copying degrades to a placeholder string.
    pub fn capture(&self, kind: LogKind, args: &[PageValue]) {
        let captured_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let arguments = args.iter().map(deep_copy).collect();
        let entry = LogEntry {
            kind,
            captured_at,
            preview: preview_of(args),
            arguments,
            origin: ORIGIN_CONSOLE.into(),
        };
        self.buffer.lock().unwrap().push(entry);
    }

    /// Value snapshot of the whole buffer, in capture order.
    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer.lock().unwrap().snapshot()
    }

    /// Empties the buffer.
    pub fn reset(&self) {
        self.buffer.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().unwrap().is_empty()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// The first string argument wins; otherwise the first argument is
/// stringified best-effort; an argument that refuses even that becomes
/// `[Object]`; no arguments at all means an empty preview.
fn preview_of(args: &[PageValue]) -> String {
    for arg in args {
        if let PageValue::Str(s) = arg {
            return s.clone();
        }
    }
    match args.first() {
        Some(first) => first.display_string().unwrap_or_else(|| "[Object]".into()),
        None => String::new(),
    }
}

/// Spawns the service loop answering boundary signals.
///
/// On `RequestLogs` the buffer snapshot is serialized into the shared
/// slot and `LogsReady` is emitted; on `RequestClear` the buffer is
/// emptied, the slot reset, and `ClearAcknowledged` emitted.
pub fn spawn_service(
    recorder: std::sync::Arc<Recorder>,
    bus: SignalBus,
    slot: DataSlot,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = rx.recv() => match received {
                    Ok(Signal::RequestLogs) => {
                        let snapshot = recorder.dump();
                        match serde_json::to_string(&snapshot) {
                            Ok(json) => slot.store(json),
                            Err(e) => {
                                // Entries are plain data; this should not
                                // happen, but an unreadable slot must not
                                // wedge the bridge.
                                warn!(error = %e, "failed to serialize snapshot");
                                slot.store(EMPTY_SLOT.into());
                            }
                        }
                        debug!(entries = snapshot.len(), "published snapshot to slot");
                        bus.emit(Signal::LogsReady);
                    }
                    Ok(Signal::RequestClear) => {
                        recorder.reset();
                        slot.store(EMPTY_SLOT.into());
                        debug!("buffer cleared");
                        bus.emit(Signal::ClearAcknowledged);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "service loop lagged behind signal bus");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}
