//! The page context: console, shared slot, signal bus, and install.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::channel::{DataSlot, SignalBus};
use crate::console::{Console, ConsoleSink, TracingSink};
use crate::recorder::{Recorder, spawn_service};

struct ServiceHandle {
    recorder: Arc<Recorder>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

/// One page execution context.
///
/// Owns the console the page's own code calls, plus the two primitives
/// the bridge can reach from the other side of the isolation boundary.
pub struct Page {
    console: Console,
    bus: SignalBus,
    slot: DataSlot,
    active: Mutex<Option<ServiceHandle>>,
}

impl Page {
    /// A page whose native console output goes to `tracing`.
    pub fn new() -> Self {
        Self::with_native(Arc::new(TracingSink))
    }

    pub fn with_native(native: Arc<dyn ConsoleSink>) -> Self {
        Self {
            console: Console::new(native),
            bus: SignalBus::new(),
            slot: DataSlot::new(),
            active: Mutex::new(None),
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    pub fn slot(&self) -> &DataSlot {
        &self.slot
    }

    /// Installs the recorder: taps the console and spawns the boundary
    /// service loop.
    ///
    /// Idempotent while the installed service is alive: a second install
    /// returns the existing recorder without wrapping or capturing
    /// anything twice. Once the service is gone (never installed, or shut
    /// down), install starts fresh with an empty buffer, which is exactly
    /// what the bridge's timeout recovery relies on.
    pub fn install(&self) -> Arc<Recorder> {
        let mut active = self.active.lock().unwrap();

        if let Some(handle) = active.as_ref() {
            if !handle.task.is_finished() {
                return handle.recorder.clone();
            }
            handle.cancel.cancel();
        }

        let recorder = Arc::new(Recorder::new());
        self.console.set_tap(recorder.clone());
        let cancel = CancellationToken::new();
        let task = spawn_service(
            recorder.clone(),
            self.bus.clone(),
            self.slot.clone(),
            cancel.clone(),
        );
        *active = Some(ServiceHandle {
            recorder: recorder.clone(),
            cancel,
            task,
        });
        info!("recorder installed, capturing console calls");
        recorder
    }

    /// Tears the recorder down: clears the tap and stops the service.
    /// Subsequent boundary requests will time out until a re-install.
    pub fn uninstall(&self) {
        let mut active = self.active.lock().unwrap();
        if let Some(handle) = active.take() {
            handle.cancel.cancel();
            self.console.clear_tap();
            info!("recorder uninstalled");
        }
    }

    pub fn is_installed(&self) -> bool {
        let active = self.active.lock().unwrap();
        matches!(active.as_ref(), Some(h) if !h.task.is_finished())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}
