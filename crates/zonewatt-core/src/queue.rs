//! # Processing Queue
//!
//! FIFO drain-on-demand task log.
//!
//! Each owning structure (zone node, history list, recent buffer, and the
//! system-wide queue of `TrackingSystem`) has its own `ProcessingQueue`.
//! Draining is a synchronous state transition: the head task is marked
//! processed and moved into an append-only history.
//!
//! Order is strictly insertion order. The reading's `Priority` is never
//! consulted here; use `PrioritySorter` where priority order is wanted.

use crate::{Reading, Task, TaskKind};
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;

/// Pending tasks plus the log of every task this queue has processed.
///
/// A task lives in exactly one of the two sequences. Once in `history`
/// it is never removed.
#[derive(Debug, Clone, Default)]
pub struct ProcessingQueue {
    /// Pending tasks, head = oldest.
    pending: VecDeque<Task>,
    /// Processed tasks in completion order.
    history: Vec<Task>,
}

impl ProcessingQueue {
    /// Create a new empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending task for `reading` and append it to the tail.
    pub fn enqueue(&mut self, reading: Arc<Reading>, kind: TaskKind) {
        self.pending.push_back(Task::new(reading, kind));
    }

    /// Process the head task.
    ///
    /// Returns `None` if nothing is pending. Otherwise the task is marked
    /// processed with the current time, appended to the history, and a copy
    /// is returned to the caller.
    pub fn drain_one(&mut self) -> Option<Task> {
        let mut task = self.pending.pop_front()?;
        task.mark_processed(Utc::now());
        self.history.push(task.clone());
        Some(task)
    }

    /// Process every pending task, returning them in drain order.
    ///
    /// Only tasks drained by this call are returned, not the full history.
    pub fn drain_all(&mut self) -> Vec<Task> {
        let mut drained = Vec::with_capacity(self.pending.len());
        while let Some(task) = self.drain_one() {
            drained.push(task);
        }
        drained
    }

    /// Number of tasks waiting to be processed.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending tasks, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.pending.iter()
    }

    /// Every task this queue has processed, in completion order.
    #[must_use]
    pub fn history(&self) -> &[Task] {
        &self.history
    }
}

// =============================================================================
// TESTS
// =============================================================================
