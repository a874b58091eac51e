use std::collections::VecDeque;

use logsieve_protocol::LogEntry;

/// Bounded FIFO buffer of captured entries.
///
/// Owned exclusively by the recorder. The only mutators are [`push`]
/// (capture) and [`clear`] (explicit reset); everything else reads a
/// value snapshot.
///
/// [`push`]: LogBuffer::push
/// [`clear`]: LogBuffer::clear
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Appends an entry, evicting the oldest when over capacity.
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Full buffer content in capture order, detached from the buffer.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
