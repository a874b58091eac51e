use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;

/// A request from the panel to the bridge.
///
/// Conceptually a remote call: the panel and the bridge run in different
/// execution contexts, so the request is a tagged message, not a function
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PanelRequest {
    GetLogs,
    ClearLogs,
}

/// Bridge response to [`PanelRequest::GetLogs`].
///
/// On a timed-out round trip `logs` is empty and `error` tells the caller
/// the recorder was re-installed and a retry is worthwhile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpResponse {
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DumpResponse {
    pub fn ok(logs: Vec<LogEntry>) -> Self {
        Self { logs, error: None }
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            logs: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Bridge response to [`PanelRequest::ClearLogs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
}
