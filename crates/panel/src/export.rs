//! Clipboard export of captured entries.

use copypasta::{ClipboardContext, ClipboardProvider};

use logsieve_protocol::{ExportedEntry, LogEntry};

/// Errors surfaced by panel operations.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for exported text. Seam so tests don't need a real
/// system clipboard.
pub trait Clipboard: Send {
    fn set_text(&mut self, text: String) -> Result<(), PanelError>;
}

/// The real system clipboard.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, PanelError> {
        let ctx = ClipboardContext::new().map_err(|e| PanelError::Clipboard(e.to_string()))?;
        Ok(Self { ctx })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: String) -> Result<(), PanelError> {
        self.ctx
            .set_contents(text)
            .map(|_| ())
            .map_err(|e| PanelError::Clipboard(e.to_string()))
    }
}

/// Pretty-printed JSON array of `{type, timestamp, args}` objects.
pub fn export_json(entries: &[&LogEntry]) -> Result<String, PanelError> {
    let exported: Vec<ExportedEntry> = entries.iter().map(|e| ExportedEntry::from(*e)).collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}
