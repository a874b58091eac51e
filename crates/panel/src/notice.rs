//! User-facing notice queue.
//!
//! Timer-based auto-dismissal is a host-UI concern; this struct just
//! holds the queue and exposes push/dismiss.

/// How long a notice stays visible, in milliseconds.
const DEFAULT_DURATION_MS: u64 = 3000;

/// The visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// One dismissible notice.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub duration_ms: u64,
}

/// In-memory notice queue with monotonic ID assignment.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Vec<Notice>,
    next_id: u64,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a notice and returns its ID.
    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push(Notice {
            id,
            level,
            message: message.into(),
            duration_ms: DEFAULT_DURATION_MS,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}
