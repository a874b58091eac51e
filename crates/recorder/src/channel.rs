//! The two primitives shared across the isolation boundary.
//!
//! The bridge and the recorder run in contexts that share a document but
//! no memory and no function references. What they do share is one text
//! cell of a well-known identity (the data node) and a broadcast signal
//! channel (the event layer). Everything else is built on these two.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use logsieve_protocol::Signal;

/// Serialized form of an empty buffer, written to the slot on clear.
pub const EMPTY_SLOT: &str = "[]";

/// The shared text cell holding the JSON-encoded snapshot.
///
/// Single-writer handoff area: the recorder overwrites it on every dump,
/// the bridge reads it after the ready signal. Not a general shared
/// memory structure.
#[derive(Debug, Clone)]
pub struct DataSlot {
    cell: Arc<Mutex<String>>,
}

impl DataSlot {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn store(&self, text: String) {
        *self.cell.lock().unwrap() = text;
    }

    pub fn read(&self) -> String {
        self.cell.lock().unwrap().clone()
    }
}

impl Default for DataSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Broadcast channel for the four boundary signals.
///
/// Signals are notifications only; payloads travel through the
/// [`DataSlot`].
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl SignalBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Emits a signal. A signal with no listener is simply lost, the
    /// way an unheard document event is.
    pub fn emit(&self, signal: Signal) {
        let _ = self.tx.send(signal);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
