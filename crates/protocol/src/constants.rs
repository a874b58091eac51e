use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Maximum number of entries the recorder's ring buffer holds.
///
/// When a capture would exceed this, the oldest entry is evicted first.
pub const MAX_LOGS: usize = 5000;

/// Time the bridge waits for the recorder to answer a signal.
///
/// If nothing arrives within this window the recorder is considered dead
/// (or never installed) and the bridge re-installs it.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(100);

/// How often the panel polls the bridge while it is open.
pub const AUTO_REFRESH_PERIOD: Duration = Duration::from_secs(2);

/// Signals exchanged between the bridge and the recorder service.
///
/// These are notifications only; log data never travels inside a signal.
/// It is handed over through the shared slot instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Bridge asks the recorder to publish its buffer to the shared slot.
    #[serde(rename = "request_logs")]
    RequestLogs,
    /// Recorder has written the snapshot; the slot is ready to read.
    #[serde(rename = "logs_ready")]
    LogsReady,
    /// Bridge asks the recorder to empty its buffer.
    #[serde(rename = "request_clear")]
    RequestClear,
    /// Recorder has emptied its buffer and reset the slot.
    #[serde(rename = "clear_acknowledged")]
    ClearAcknowledged,
}
