//! The ordered list of entries shown in the panel.
//!
//! Entries are kept oldest first and only ever appended. A conversation may
//! optionally be bounded, in which case the oldest entries are evicted to make
//! room for new ones.

use crate::core::message::MessageEntry;
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    entries: VecDeque<MessageEntry>,
    capacity: Option<usize>,
    revision: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation holding at most `capacity` entries. A capacity of zero
    /// is treated as one so the newest entry is always visible.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(capacity) => Self::bounded(capacity),
            None => Self::new(),
        }
    }

    pub fn append(&mut self, entry: MessageEntry) {
        debug_assert!(!entry.text.is_empty(), "entries carry a label");
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity {
                self.entries.pop_front();
            }
        }
        self.entries.push_back(entry);
        self.revision += 1;
    }

    pub fn entries(&self) -> &VecDeque<MessageEntry> {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&MessageEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Number of appends since creation. Unlike `len`, this keeps moving once
    /// a bounded conversation is full.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
