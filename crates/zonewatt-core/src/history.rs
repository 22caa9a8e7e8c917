//! # History List
//!
//! Append-only doubly linked record of every reading accepted system-wide.
//!
//! Links are arena indices rather than pointers: `head.prev` and `tail.next`
//! are `None`, every other link names a live entry, and the chain is acyclic
//! because entries are only ever appended at the tail.

use crate::queue::ProcessingQueue;
use crate::{Reading, Task, TaskKind};
use std::sync::Arc;

/// One link of the history chain.
#[derive(Debug, Clone)]
struct HistoryEntry {
    reading: Arc<Reading>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly linked, append-only reading history with its own queue.
#[derive(Debug, Clone, Default)]
pub struct HistoryList {
    entries: Vec<HistoryEntry>,
    head: Option<usize>,
    tail: Option<usize>,
    queue: ProcessingQueue,
}

impl HistoryList {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `reading` at the tail and enqueue a `historical_analysis` task.
    pub fn append(&mut self, reading: Arc<Reading>) {
        let idx = self.entries.len();
        self.entries.push(HistoryEntry {
            reading: Arc::clone(&reading),
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(old_tail) => self.entries[old_tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);

        self.queue.enqueue(reading, TaskKind::HistoricalAnalysis);
    }

    /// Number of readings recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest reading.
    #[must_use]
    pub fn head(&self) -> Option<&Arc<Reading>> {
        self.head.map(|idx| &self.entries[idx].reading)
    }

    /// Newest reading.
    #[must_use]
    pub fn tail(&self) -> Option<&Arc<Reading>> {
        self.tail.map(|idx| &self.entries[idx].reading)
    }

    /// Walk the chain. Forward is oldest -> newest; `.rev()` follows the
    /// `prev` links from the tail.
    #[must_use]
    pub fn iter(&self) -> HistoryIter<'_> {
        HistoryIter {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.entries.len(),
        }
    }

    /// The history's private queue.
    #[must_use]
    pub fn queue(&self) -> &ProcessingQueue {
        &self.queue
    }

    /// Drain the private queue, returning the tasks processed by this call.
    pub fn drain_pending(&mut self) -> Vec<Task> {
        self.queue.drain_all()
    }
}

/// Double-ended iterator over a `HistoryList`.
pub struct HistoryIter<'a> {
    list: &'a HistoryList,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for HistoryIter<'a> {
    type Item = &'a Arc<Reading>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.list.entries[self.front?];
        self.front = entry.next;
        self.remaining -= 1;
        Some(&entry.reading)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for HistoryIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = &self.list.entries[self.back?];
        self.back = entry.prev;
        self.remaining -= 1;
        Some(&entry.reading)
    }
}

impl ExactSizeIterator for HistoryIter<'_> {}

impl<'a> IntoIterator for &'a HistoryList {
    type Item = &'a Arc<Reading>;
    type IntoIter = HistoryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// TESTS
// =============================================================================
