//! # Recent Buffer
//!
//! Fixed-capacity ring of the most recently accepted readings.
//!
//! The buffer does not evict: once `capacity` readings are held, further
//! enqueues are rejected until a caller frees slots with `dequeue`.

use crate::primitives::DEFAULT_RECENT_CAPACITY;
use crate::queue::ProcessingQueue;
use crate::{Reading, Task, TaskKind, TrackingError};
use std::sync::Arc;

/// Ring buffer of readings with its own processing queue.
#[derive(Debug, Clone)]
pub struct RecentBuffer {
    /// Ring storage, `capacity` slots.
    slots: Vec<Option<Arc<Reading>>>,
    /// Slot of the oldest held reading.
    front: usize,
    /// Number of held readings.
    len: usize,
    /// Private queue of `recent_analysis` tasks.
    queue: ProcessingQueue,
}

impl Default for RecentBuffer {
    /// A buffer of `DEFAULT_RECENT_CAPACITY` slots.
    fn default() -> Self {
        Self::with_slots(DEFAULT_RECENT_CAPACITY)
    }
}

impl RecentBuffer {
    fn with_slots(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            front: 0,
            len: 0,
            queue: ProcessingQueue::new(),
        }
    }

    /// Create a buffer holding at most `capacity` readings.
    ///
    /// # Errors
    /// `InvalidConfig` if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, TrackingError> {
        if capacity == 0 {
            return Err(TrackingError::InvalidConfig(
                "recent buffer capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self::with_slots(capacity))
    }

    /// Store `reading` after the newest held reading and enqueue a
    /// `recent_analysis` task.
    ///
    /// # Errors
    /// `RecentBufferFull` if the buffer is at capacity. Nothing is mutated.
    pub fn enqueue(&mut self, reading: Arc<Reading>) -> Result<(), TrackingError> {
        if self.is_full() {
            return Err(TrackingError::RecentBufferFull {
                capacity: self.capacity(),
            });
        }

        let rear = (self.front + self.len) % self.capacity();
        self.slots[rear] = Some(Arc::clone(&reading));
        self.len += 1;
        self.queue.enqueue(reading, TaskKind::RecentAnalysis);
        Ok(())
    }

    /// Remove and return the oldest held reading, freeing its slot.
    ///
    /// Returns `None` if the buffer is empty. Tasks already enqueued for the
    /// reading stay in the queue.
    pub fn dequeue(&mut self) -> Option<Arc<Reading>> {
        if self.is_empty() {
            return None;
        }
        let reading = self.slots[self.front].take();
        self.front = (self.front + 1) % self.capacity();
        self.len -= 1;
        reading
    }

    /// Maximum number of held readings.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of held readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no readings are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the buffer is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Held readings from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Reading>> {
        let capacity = self.capacity();
        (0..self.len)
            .filter_map(move |offset| self.slots[(self.front + offset) % capacity].as_ref())
    }

    /// The buffer's private queue.
    #[must_use]
    pub fn queue(&self) -> &ProcessingQueue {
        &self.queue
    }

    /// Drain the private queue, returning the tasks processed by this call.
    pub fn drain_pending(&mut self) -> Vec<Task> {
        self.queue.drain_all()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceId, Priority, ReadingType};
    use chrono::Utc;

    fn make_reading(device: &str) -> Arc<Reading> {
        Arc::new(Reading::new(
            Utc::now(),
            1.0,
            DeviceId::new(device),
            ReadingType::new("live"),
            Priority::Medium,
        ))
    }

    fn held(buffer: &RecentBuffer) -> Vec<String> {
        buffer
            .iter()
            .map(|r| r.device_id.as_str().to_string())
            .collect()
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            RecentBuffer::new(0),
            Err(TrackingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_when_full_without_mutation() {
        let mut buffer = RecentBuffer::new(2).expect("buffer");

        assert!(buffer.enqueue(make_reading("a")).is_ok());
        assert!(buffer.enqueue(make_reading("b")).is_ok());
        assert!(buffer.is_full());

        let result = buffer.enqueue(make_reading("c"));

        assert_eq!(result, Err(TrackingError::RecentBufferFull { capacity: 2 }));
        assert_eq!(buffer.len(), 2);
        assert_eq!(held(&buffer), vec!["a", "b"]);
        assert_eq!(buffer.queue().pending_count(), 2);
    }

    #[test]
    fn dequeue_frees_a_slot_and_wraps() {
        let mut buffer = RecentBuffer::new(3).expect("buffer");
        for device in ["a", "b", "c"] {
            buffer.enqueue(make_reading(device)).expect("enqueue");
        }

        let oldest = buffer.dequeue().expect("dequeue");
        assert_eq!(oldest.device_id.as_str(), "a");
        assert!(!buffer.is_full());

        buffer.enqueue(make_reading("d")).expect("enqueue after dequeue");
        assert_eq!(held(&buffer), vec!["b", "c", "d"]);
    }

    #[test]
    fn default_has_hourly_capacity() {
        let buffer = RecentBuffer::default();
        assert_eq!(buffer.capacity(), DEFAULT_RECENT_CAPACITY);
        assert!(buffer.is_empty());
    }

    #[test]
    fn dequeue_empty_returns_none() {
        let mut buffer = RecentBuffer::new(1).expect("buffer");
        assert!(buffer.dequeue().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn accepted_enqueues_create_recent_tasks() {
        let mut buffer = RecentBuffer::new(1).expect("buffer");
        buffer.enqueue(make_reading("a")).expect("enqueue");
        let _ = buffer.enqueue(make_reading("b"));

        let drained = buffer.drain_pending();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind(), TaskKind::RecentAnalysis);
        assert_eq!(drained[0].reading().device_id.as_str(), "a");
    }
}
