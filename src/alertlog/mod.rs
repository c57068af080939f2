//! Alert/Log Recorder - bounded, time-ordered log of state transitions
//! and anomaly events.
//!
//! Entries are inserted at the head (newest first) and the log is truncated
//! to its configured capacity, evicting strictly oldest-first. Entries are
//! never mutated after insertion.

use std::collections::VecDeque;

use crate::types::{LogEntry, LogLevel};

/// Bounded newest-first alert log.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert an entry at the head, evicting the oldest if at capacity.
    pub fn append(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Convenience: build and append an entry.
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        self.append(LogEntry::new(level, message));
    }

    /// Entries in newest-first display order.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Snapshot of entries, newest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
