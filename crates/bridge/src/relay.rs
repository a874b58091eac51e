//! The signal/slot round trips and their timeout recovery.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::time::timeout;
use tracing::{debug, warn};

use logsieve_protocol::constants::RESPONSE_TIMEOUT;
use logsieve_protocol::{ClearResponse, DumpResponse, LogEntry, Signal};
use logsieve_recorder::{DataSlot, Page, SignalBus};

/// Re-installs the recorder in the page context when it stops answering.
pub type Reinstaller = Arc<dyn Fn() + Send + Sync>;

/// One side of the isolation boundary: emits request signals, awaits the
/// matching ready signal, reads the shared slot.
pub struct Relay {
    bus: SignalBus,
    slot: DataSlot,
    reinstall: Reinstaller,
}

impl Relay {
    pub fn new(bus: SignalBus, slot: DataSlot, reinstall: Reinstaller) -> Self {
        Self {
            bus,
            slot,
            reinstall,
        }
    }

    /// Wires a relay directly to a page, with re-install going through
    /// [`Page::install`].
    pub fn attached_to(page: &Arc<Page>) -> Self {
        let target = page.clone();
        Self::new(
            page.bus().clone(),
            page.slot().clone(),
            Arc::new(move || {
                target.install();
            }),
        )
    }

    /// Round trip for `getLogs`.
    ///
    /// The listener is subscribed before the request signal goes out, so
    /// the ready signal cannot slip past it. Exactly one of the two arms
    /// of the timeout race resolves the request.
    pub async fn get_logs(&self) -> DumpResponse {
        let rx = self.bus.subscribe();
        self.bus.emit(Signal::RequestLogs);

        match timeout(RESPONSE_TIMEOUT, wait_for(rx, Signal::LogsReady)).await {
            Ok(()) => {
                let logs = self.read_slot();
                debug!(entries = logs.len(), "snapshot received");
                DumpResponse::ok(logs)
            }
            Err(_) => {
                warn!("recorder not responding, re-installing");
                (self.reinstall)();
                DumpResponse::timed_out("recorder re-installed, try again")
            }
        }
    }

    /// Round trip for `clearLogs`, with the same deadline.
    ///
    /// A timeout still reports success: the re-installed recorder starts
    /// with an empty buffer, so the logs are gone either way.
    pub async fn clear_logs(&self) -> ClearResponse {
        let rx = self.bus.subscribe();
        self.bus.emit(Signal::RequestClear);

        match timeout(RESPONSE_TIMEOUT, wait_for(rx, Signal::ClearAcknowledged)).await {
            Ok(()) => ClearResponse { success: true },
            Err(_) => {
                warn!("recorder not responding to clear, re-installing");
                (self.reinstall)();
                ClearResponse { success: true }
            }
        }
    }

    /// Parses the slot content. Malformed content is treated as an empty
    /// log set, never an error.
    fn read_slot(&self) -> Vec<LogEntry> {
        let text = self.slot.read();
        match serde_json::from_str(&text) {
            Ok(logs) => logs,
            Err(e) => {
                warn!(error = %e, "failed to parse shared slot content");
                Vec::new()
            }
        }
    }
}

async fn wait_for(mut rx: broadcast::Receiver<Signal>, want: Signal) {
    loop {
        match rx.recv().await {
            Ok(signal) if signal == want => return,
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            // Sender gone; let the timeout arm settle the request.
            Err(broadcast::error::RecvError::Closed) => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use logsieve_recorder::PageValue;

    fn counting_reinstaller() -> (Reinstaller, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counted = count.clone();
        let reinstall: Reinstaller = Arc::new(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        (reinstall, count)
    }

    #[tokio::test]
    async fn get_logs_round_trip() {
        let page = Arc::new(Page::new());
        page.install();
        page.console().log(&[PageValue::str("ping")]);

        let relay = Relay::attached_to(&page);
        let resp = relay.get_logs().await;
        assert!(resp.error.is_none());
        assert_eq!(resp.logs.len(), 1);
        assert_eq!(resp.logs[0].preview, "ping");
    }

    #[tokio::test(start_paused = true)]
    async fn get_logs_times_out_and_reinstalls_exactly_once() {
        let page = Arc::new(Page::new());
        // Never installed: nothing will answer.
        let (reinstall, count) = counting_reinstaller();
        let relay = Relay::new(page.bus().clone(), page.slot().clone(), reinstall);

        let resp = relay.get_logs().await;
        assert!(resp.logs.is_empty());
        assert!(resp.error.is_some());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // A second timed-out request re-installs again, once.
        let resp = relay.get_logs().await;
        assert!(resp.error.is_some());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_request_recovers_on_retry() {
        let page = Arc::new(Page::new());
        let relay = Relay::attached_to(&page);

        // First request finds no recorder, re-installs a real one.
        let resp = relay.get_logs().await;
        assert!(resp.error.is_some());
        assert!(page.is_installed());

        // Retry succeeds against the fresh install.
        page.console().log(&[PageValue::str("after recovery")]);
        let resp = relay.get_logs().await;
        assert!(resp.error.is_none());
        assert_eq!(resp.logs.len(), 1);
    }

    #[tokio::test]
    async fn clear_logs_round_trip() {
        let page = Arc::new(Page::new());
        let recorder = page.install();
        page.console().log(&[PageValue::str("to be cleared")]);
        assert_eq!(recorder.len(), 1);

        let relay = Relay::attached_to(&page);
        let resp = relay.clear_logs().await;
        assert!(resp.success);
        assert!(recorder.is_empty());

        // The slot now reads as an empty set.
        let resp = relay.get_logs().await;
        assert!(resp.logs.is_empty());
        assert!(resp.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_timeout_reinstalls_and_reports_success() {
        let page = Arc::new(Page::new());
        let (reinstall, count) = counting_reinstaller();
        let relay = Relay::new(page.bus().clone(), page.slot().clone(), reinstall);

        let resp = relay.clear_logs().await;
        assert!(resp.success);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_slot_content_reads_as_empty() {
        let page = Arc::new(Page::new());
        page.install();
        // Sabotage the slot after install; the service overwrites it on
        // request, so corrupt it through a stale ready signal instead:
        // easier to exercise read_slot directly.
        page.slot().store("{not json".into());
        let relay = Relay::attached_to(&page);
        assert!(relay.read_slot().is_empty());
    }
}
