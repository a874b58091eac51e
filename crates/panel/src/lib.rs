//! Privileged-context panel state for logsieve.
//!
//! Drives the bridge on demand and on a 2 s cadence, filters captured
//! entries by substring or regex, tracks a selection over the filtered
//! view, exports to the clipboard, and queues user-facing notices.
//! Rendering is a host-UI concern and lives outside this crate.

mod controller;
mod export;
mod filter;
mod notice;
mod selection;
mod settings;

pub use controller::{Controller, spawn_auto_refresh};
pub use export::{Clipboard, PanelError, SystemClipboard, export_json};
pub use filter::{filter_indices, matches_pattern};
pub use notice::{Notice, NoticeLevel, NoticeQueue};
pub use selection::Selection;
pub use settings::{FilterSettings, SettingsError, SettingsStore, default_settings_path};
