//! # Zone Node
//!
//! One named node of the consumption hierarchy.
//!
//! A node owns its readings, its running consumption total and a private
//! `ProcessingQueue`. Children and parent are `ZoneId` handles into the
//! owning `HierarchyTree` arena, never references.

use crate::queue::ProcessingQueue;
use crate::{Reading, Task, TaskKind, ZoneId};
use std::sync::Arc;

/// A zone in the hierarchy (building, floor, room, ...).
#[derive(Debug, Clone)]
pub struct ZoneNode {
    /// Handle of this node in its tree.
    id: ZoneId,
    /// Unique name; the registry key.
    name: String,
    /// Parent handle. `None` only for the root.
    parent: Option<ZoneId>,
    /// Child handles in attach order.
    children: Vec<ZoneId>,
    /// Readings attached to this zone, append-only.
    readings: Vec<Arc<Reading>>,
    /// Running sum of `readings[*].consumption`.
    total_consumption: f64,
    /// Private queue of `consumption_analysis` tasks.
    queue: ProcessingQueue,
}

impl ZoneNode {
    /// Create an empty node.
    #[must_use]
    pub fn new(id: ZoneId, name: impl Into<String>, parent: Option<ZoneId>) -> Self {
        Self {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            readings: Vec::new(),
            total_consumption: 0.0,
            queue: ProcessingQueue::new(),
        }
    }

    /// Record `child` as owned by this node.
    ///
    /// The caller guarantees a child is attached once and never forms a
    /// cycle; `HierarchyTree` only attaches freshly created nodes.
    pub fn add_child(&mut self, child: ZoneId) {
        self.children.push(child);
    }

    /// Append a reading, add its consumption to the running total and
    /// enqueue a `consumption_analysis` task.
    ///
    /// The total is accumulated, never recomputed from stored readings.
    #[allow(clippy::float_arithmetic)]
    pub fn add_reading(&mut self, reading: Arc<Reading>) {
        self.total_consumption += reading.consumption;
        self.queue
            .enqueue(Arc::clone(&reading), TaskKind::ConsumptionAnalysis);
        self.readings.push(reading);
    }

    /// Drain the private queue, returning the tasks processed by this call.
    pub fn drain_pending(&mut self) -> Vec<Task> {
        self.queue.drain_all()
    }

    /// Handle of this node.
    #[must_use]
    pub fn id(&self) -> ZoneId {
        self.id
    }

    /// Name of this node.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent handle, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<ZoneId> {
        self.parent
    }

    /// Child handles in attach order.
    #[must_use]
    pub fn children(&self) -> &[ZoneId] {
        &self.children
    }

    /// Readings attached to this node, oldest first.
    #[must_use]
    pub fn readings(&self) -> &[Arc<Reading>] {
        &self.readings
    }

    /// Number of readings attached to this node.
    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    /// Accumulated consumption in kWh.
    #[must_use]
    pub fn total_consumption(&self) -> f64 {
        self.total_consumption
    }

    /// The node's private queue.
    #[must_use]
    pub fn queue(&self) -> &ProcessingQueue {
        &self.queue
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::float_arithmetic)]

    use super::*;
    use crate::{DeviceId, Priority, ReadingType};
    use chrono::Utc;

    fn make_reading(consumption: f64) -> Arc<Reading> {
        Arc::new(Reading::new(
            Utc::now(),
            consumption,
            DeviceId::new("meter"),
            ReadingType::new("peak"),
            Priority::Medium,
        ))
    }

    #[test]
    fn add_reading_accumulates_and_enqueues() {
        let mut node = ZoneNode::new(ZoneId(1), "Room 101", Some(ZoneId::ROOT));

        node.add_reading(make_reading(2.5));
        node.add_reading(make_reading(1.5));

        assert_eq!(node.reading_count(), 2);
        assert!((node.total_consumption() - 4.0).abs() < 1e-9);
        assert_eq!(node.queue().pending_count(), 2);
    }

    #[test]
    fn drain_pending_returns_consumption_tasks() {
        let mut node = ZoneNode::new(ZoneId(1), "Room 101", Some(ZoneId::ROOT));
        node.add_reading(make_reading(1.0));

        let drained = node.drain_pending();

        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].kind(), TaskKind::ConsumptionAnalysis);
        assert!(node.drain_pending().is_empty());
        assert_eq!(node.queue().history().len(), 1);
    }

    #[test]
    fn readings_are_shared_not_copied() {
        let mut node = ZoneNode::new(ZoneId::ROOT, "Building", None);
        let reading = make_reading(3.0);

        node.add_reading(Arc::clone(&reading));

        assert!(Arc::ptr_eq(&node.readings()[0], &reading));
        let pending = node.queue().pending().next().expect("task");
        assert!(Arc::ptr_eq(pending.reading(), &reading));
    }

    #[test]
    fn children_keep_attach_order() {
        let mut node = ZoneNode::new(ZoneId::ROOT, "Building", None);
        node.add_child(ZoneId(2));
        node.add_child(ZoneId(1));
        assert_eq!(node.children(), &[ZoneId(2), ZoneId(1)]);
        assert!(node.parent().is_none());
    }
}
