use serde::{Deserialize, Serialize};

/// Which console entry point produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl LogKind {
    /// All five intercepted entry points, in install order.
    pub const ALL: [LogKind; 5] = [
        LogKind::Log,
        LogKind::Info,
        LogKind::Warn,
        LogKind::Error,
        LogKind::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Log => "log",
            LogKind::Info => "info",
            LogKind::Warn => "warn",
            LogKind::Error => "error",
            LogKind::Debug => "debug",
        }
    }
}

/// Origin tag for entries captured from page console calls.
pub const ORIGIN_CONSOLE: &str = "console";

/// One captured console call.
///
/// Immutable once built. The JSON key names (`type`, `timestamp`, `args`,
/// `source`) are the wire format the shared slot and the clipboard export
/// both use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// ISO-8601 capture time, assigned by the capture-context clock.
    #[serde(rename = "timestamp")]
    pub captured_at: String,
    /// First string argument, or a best-effort stringification of the
    /// first argument, or empty.
    pub preview: String,
    /// Deep-copied arguments in original call order.
    #[serde(rename = "args")]
    pub arguments: Vec<serde_json::Value>,
    #[serde(rename = "source")]
    pub origin: String,
}

/// The clipboard-export projection of a [`LogEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedEntry {
    #[serde(rename = "type")]
    pub kind: LogKind,
    #[serde(rename = "timestamp")]
    pub captured_at: String,
    #[serde(rename = "args")]
    pub arguments: Vec<serde_json::Value>,
}

impl From<&LogEntry> for ExportedEntry {
    fn from(entry: &LogEntry) -> Self {
        Self {
            kind: entry.kind,
            captured_at: entry.captured_at.clone(),
            arguments: entry.arguments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            kind: LogKind::Warn,
            captured_at: "2024-05-01T12:00:00.000Z".into(),
            preview: "careful".into(),
            arguments: vec![
                serde_json::json!("careful"),
                serde_json::json!({"code": 7}),
            ],
            origin: ORIGIN_CONSOLE.into(),
        }
    }

    #[test]
    fn log_entry_wire_keys() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json["type"], "warn");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["preview"], "careful");
        assert_eq!(json["args"][1]["code"], 7);
        assert_eq!(json["source"], "console");
    }

    #[test]
    fn log_entry_roundtrip() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, parsed);
    }

    #[test]
    fn kind_serializes_lowercase() {
        for kind in LogKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn exported_entry_drops_preview_and_source() {
        let entry = sample_entry();
        let exported = ExportedEntry::from(&entry);
        let json = serde_json::to_value(&exported).unwrap();
        assert!(json.get("preview").is_none());
        assert!(json.get("source").is_none());
        assert_eq!(json["type"], "warn");
        assert_eq!(json["args"], serde_json::to_value(&entry.arguments).unwrap());
    }
}
