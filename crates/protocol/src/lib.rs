//! Wire protocol types for the logsieve capture pipeline.
//!
//! Shared by all three execution contexts: the in-page recorder, the
//! isolated-context bridge, and the privileged panel. The JSON key names
//! are part of the wire format and must not change.

pub mod constants;
pub mod entry;
pub mod messages;

pub use constants::Signal;
pub use entry::{ExportedEntry, LogEntry, LogKind};
pub use messages::{ClearResponse, DumpResponse, PanelRequest};
