//! Persisted filter settings.
//!
//! A small JSON key-value file: `pattern` and `useRegex`. Loaded once at
//! panel start, written back on every edit.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors from settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The two persisted preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default)]
    pub pattern: String,
    #[serde(default, rename = "useRegex")]
    pub use_regex: bool,
}

/// File-backed settings store: cached in memory, persisted on mutation.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<FilterSettings>,
}

impl SettingsStore {
    /// Opens a store, loading existing settings from disk. A missing
    /// file means defaults.
    pub fn new(path: PathBuf) -> Result<Self, SettingsError> {
        let current = load_settings(&path)?;
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    pub fn get(&self) -> FilterSettings {
        self.current.read().unwrap().clone()
    }

    pub fn set_pattern(&self, pattern: impl Into<String>) -> Result<(), SettingsError> {
        self.current.write().unwrap().pattern = pattern.into();
        self.persist()
    }

    pub fn set_use_regex(&self, use_regex: bool) -> Result<(), SettingsError> {
        self.current.write().unwrap().use_regex = use_regex;
        self.persist()
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let settings = self.current.read().unwrap();
        let json = serde_json::to_string_pretty(&*settings)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "settings persisted");
        Ok(())
    }
}

fn load_settings(path: &Path) -> Result<FilterSettings, SettingsError> {
    if !path.exists() {
        return Ok(FilterSettings::default());
    }
    let data = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

/// Default settings location under the user's config directory.
pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("logsieve")
            .join("settings.json")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("logsieve").join("settings.json")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        PathBuf::from("/tmp/logsieve/settings.json")
    }
}
