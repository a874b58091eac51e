//! The controller: bridge driving, filter application, export.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use logsieve_bridge::BridgeHandle;
use logsieve_protocol::LogEntry;
use logsieve_protocol::constants::AUTO_REFRESH_PERIOD;

use crate::export::{Clipboard, export_json};
use crate::filter::filter_indices;
use crate::notice::{NoticeLevel, NoticeQueue};
use crate::selection::Selection;
use crate::settings::SettingsStore;

/// Panel state machine: owns the extracted entries, the filtered view,
/// the selection, and the notice queue. Rendering reads this; nothing
/// here renders.
pub struct Controller {
    bridge: BridgeHandle,
    settings: SettingsStore,
    clipboard: Box<dyn Clipboard>,
    extracted: Vec<LogEntry>,
    filtered: Vec<usize>,
    selection: Selection,
    notices: NoticeQueue,
}

impl Controller {
    pub fn new(bridge: BridgeHandle, settings: SettingsStore, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            bridge,
            settings,
            clipboard,
            extracted: Vec::new(),
            filtered: Vec::new(),
            selection: Selection::new(),
            notices: NoticeQueue::new(),
        }
    }

    /// Pulls the current snapshot through the bridge.
    ///
    /// `announce` adds a loaded/empty notice, the way an explicit refresh
    /// click does; auto-refresh ticks pass `false`.
    pub async fn refresh(&mut self, announce: bool) {
        match self.bridge.get_logs().await {
            Ok(resp) => {
                let timed_out = resp.error.clone();
                self.extracted = resp.logs;
                self.apply_filter(false);

                if let Some(message) = timed_out {
                    self.notices.push(NoticeLevel::Warning, message);
                } else if announce {
                    if self.extracted.is_empty() {
                        self.notices.push(
                            NoticeLevel::Warning,
                            "No logs captured yet. Try refreshing the page or creating new logs.",
                        );
                    } else {
                        self.notices.push(
                            NoticeLevel::Success,
                            format!("Loaded {} logs", self.extracted.len()),
                        );
                    }
                }
            }
            Err(e) => {
                self.extracted.clear();
                self.apply_filter(false);
                self.notices.push(NoticeLevel::Error, e.to_string());
            }
        }
    }

    /// Updates the pattern: persists it, re-filters, drops the selection.
    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        if let Err(e) = self.settings.set_pattern(pattern) {
            warn!(error = %e, "failed to persist pattern");
        }
        self.apply_filter(true);
    }

    /// Toggles regex mode: persists it, re-filters, drops the selection.
    pub fn set_use_regex(&mut self, use_regex: bool) {
        if let Err(e) = self.settings.set_use_regex(use_regex) {
            warn!(error = %e, "failed to persist regex flag");
        }
        self.apply_filter(true);
    }

    fn apply_filter(&mut self, filter_changed: bool) {
        if filter_changed {
            // Positions are not stable across filter changes.
            self.selection.clear();
        }
        let settings = self.settings.get();
        self.filtered = filter_indices(&self.extracted, &settings.pattern, settings.use_regex);
        debug!(
            total = self.extracted.len(),
            filtered = self.filtered.len(),
            "filter applied"
        );
    }

    /// Entries of the current filtered view, in capture order.
    pub fn filtered_entries(&self) -> Vec<&LogEntry> {
        self.filtered
            .iter()
            .filter_map(|&i| self.extracted.get(i))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.extracted.len()
    }

    /// The `"N of M logs (k selected)"` line.
    pub fn stats_line(&self) -> String {
        let base = format!("{} of {} logs", self.filtered.len(), self.extracted.len());
        if self.selection.is_empty() {
            base
        } else {
            format!("{base} ({} selected)", self.selection.len())
        }
    }

    /// Marks or unmarks a position within the filtered view.
    pub fn set_selected(&mut self, position: usize, selected: bool) {
        if position < self.filtered.len() {
            self.selection.set(position, selected);
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Copies every filtered entry to the clipboard as JSON.
    pub fn copy_filtered(&mut self) {
        if self.filtered.is_empty() {
            self.notices.push(NoticeLevel::Warning, "No logs to copy");
            return;
        }
        let count = self.filtered.len();
        let exported = export_json(&self.filtered_entries());
        match exported.and_then(|text| self.clipboard.set_text(text)) {
            Ok(()) => {
                self.notices
                    .push(NoticeLevel::Success, format!("Copied {count} logs"));
            }
            Err(e) => {
                warn!(error = %e, "copy failed");
                self.notices.push(NoticeLevel::Error, "Failed to copy logs");
            }
        }
    }

    /// Copies only the selected entries, in original relative order.
    pub fn copy_selected(&mut self) {
        if self.selection.is_empty() {
            self.notices.push(
                NoticeLevel::Warning,
                "No logs selected. Mark the logs you want to copy.",
            );
            return;
        }
        let (count, exported) = {
            let view = self.filtered_entries();
            let entries: Vec<&LogEntry> = self
                .selection
                .ordered()
                .into_iter()
                .filter_map(|pos| view.get(pos).copied())
                .collect();
            (entries.len(), export_json(&entries))
        };
        match exported.and_then(|text| self.clipboard.set_text(text)) {
            Ok(()) => {
                self.notices
                    .push(NoticeLevel::Success, format!("Copied {count} selected logs"));
            }
            Err(e) => {
                warn!(error = %e, "copy failed");
                self.notices
                    .push(NoticeLevel::Error, "Failed to copy selected logs");
            }
        }
    }

    /// Asks the recorder to drop everything it has captured.
    pub async fn clear(&mut self) {
        match self.bridge.clear_logs().await {
            Ok(resp) if resp.success => {
                self.extracted.clear();
                self.filtered.clear();
                self.selection.clear();
                self.notices.push(NoticeLevel::Success, "Logs cleared");
            }
            _ => {
                self.notices.push(NoticeLevel::Error, "Could not clear logs");
            }
        }
    }

    pub fn notices(&self) -> &[crate::notice::Notice] {
        self.notices.notices()
    }

    pub fn dismiss_notice(&mut self, id: u64) {
        self.notices.dismiss(id);
    }
}

/// Polls the bridge every two seconds until the token is cancelled.
///
/// Each tick is an independent request with its own correlation; a tick
/// that lands while a previous one is still in flight just queues behind
/// it at the bridge.
pub fn spawn_auto_refresh(
    controller: Arc<Mutex<Controller>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(AUTO_REFRESH_PERIOD);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    controller.lock().await.refresh(false).await;
                }
            }
        }
        debug!("auto-refresh stopped");
    })
}
