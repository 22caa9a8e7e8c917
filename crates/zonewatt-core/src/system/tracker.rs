//! # Tracking System
//!
//! The top-level aggregate. One accepted reading fans out to four owners:
//!
//! ```text
//!                      add_reading(reading, zone)
//!                                 │
//!                    zone registered? ── no ──> Err(ZoneNotFound), nothing touched
//!                                 │ yes
//!        ┌───────────────┬────────┴────────┬──────────────────┐
//!        ▼               ▼                 ▼                  ▼
//!   ZoneNode        HistoryList       RecentBuffer       global queue
//!   consumption_    historical_       recent_analysis    system_analysis
//!   analysis        analysis          (skipped if full)
//! ```
//!
//! `process_all_pending` drains the global queue and every zone queue. The
//! history and recent queues are drained separately, by explicit calls.

use super::metrics::TrackingMetrics;
use super::report::{ProcessingReport, ZoneBatch};
use crate::config::TrackerConfig;
use crate::hierarchy::HierarchyTree;
use crate::history::HistoryList;
use crate::queue::ProcessingQueue;
use crate::recent::RecentBuffer;
use crate::{Reading, Task, TaskKind, TrackingError, ZoneId};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of an accepted `add_reading` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// The zone the reading was attached to.
    pub zone: ZoneId,
    /// Whether the recent buffer took the reading. A full buffer does not
    /// fail the submission.
    pub recent_accepted: bool,
}

/// Zone hierarchy, history list, recent buffer and global queue, kept in
/// step by `add_reading`.
#[derive(Debug, Clone, Default)]
pub struct TrackingSystem {
    hierarchy: HierarchyTree,
    history: HistoryList,
    recent: RecentBuffer,
    global: ProcessingQueue,
}

impl TrackingSystem {
    /// Create a system with the default recent capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a system from configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration fails validation.
    pub fn with_config(config: &TrackerConfig) -> Result<Self, TrackingError> {
        config.validate()?;
        Ok(Self {
            hierarchy: HierarchyTree::new(),
            history: HistoryList::new(),
            recent: RecentBuffer::new(config.recent_capacity)?,
            global: ProcessingQueue::new(),
        })
    }

    /// Create a system whose recent buffer holds `capacity` readings.
    pub fn with_recent_capacity(capacity: usize) -> Result<Self, TrackingError> {
        Self::with_config(&TrackerConfig {
            recent_capacity: capacity,
        })
    }

    // =========================================================================
    // ZONES
    // =========================================================================

    /// Register a zone under `parent`. See `HierarchyTree::add_zone`.
    pub fn add_zone(&mut self, name: &str, parent: &str) -> Result<ZoneId, TrackingError> {
        self.hierarchy.add_zone(name, parent)
    }

    // =========================================================================
    // INGESTION
    // =========================================================================

    /// Record a reading against `zone` in every structure.
    ///
    /// The reading is validated and the zone resolved first; if either fails
    /// the call returns the error and no structure is modified. Once the zone
    /// accepts the reading, it is appended to the history, offered to the
    /// recent buffer, and a `system_analysis` task is enqueued. A full recent
    /// buffer is reported through `Submission::recent_accepted`, not as an
    /// error.
    pub fn add_reading(
        &mut self,
        reading: impl Into<Arc<Reading>>,
        zone: &str,
    ) -> Result<Submission, TrackingError> {
        let reading = reading.into();
        reading.validate()?;

        let zone_id = self.hierarchy.attach_reading(zone, Arc::clone(&reading))?;
        self.history.append(Arc::clone(&reading));

        let recent_accepted = match self.recent.enqueue(Arc::clone(&reading)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    zone,
                    device = reading.device_id.as_str(),
                    "recent buffer skipped: {}",
                    e
                );
                false
            }
        };

        self.global.enqueue(reading, TaskKind::SystemAnalysis);

        tracing::debug!(zone, recent_accepted, "reading recorded");
        Ok(Submission {
            zone: zone_id,
            recent_accepted,
        })
    }

    // =========================================================================
    // PROCESSING
    // =========================================================================

    /// Drain the global queue, then every zone queue in registry order.
    ///
    /// Zones with nothing pending are left out of the report. The history
    /// and recent queues are not touched.
    pub fn process_all_pending(&mut self) -> ProcessingReport {
        self.sweep(|| false)
    }

    /// Like `process_all_pending`, but checks `cancel` before each zone.
    ///
    /// The global queue is always drained in full. When `cancel` is set,
    /// the remaining zones keep their pending tasks and the report is
    /// marked `cancelled`.
    pub fn process_all_pending_until(&mut self, cancel: &AtomicBool) -> ProcessingReport {
        self.sweep(|| cancel.load(Ordering::Acquire))
    }

    fn sweep(&mut self, should_stop: impl Fn() -> bool) -> ProcessingReport {
        let mut report = ProcessingReport {
            system: self.global.drain_all(),
            ..ProcessingReport::default()
        };

        let names: Vec<String> = self.hierarchy.names().map(str::to_string).collect();
        for name in names {
            if should_stop() {
                report.cancelled = true;
                break;
            }
            let tasks = self.hierarchy.drain_zone(&name);
            if !tasks.is_empty() {
                report.zones.push(ZoneBatch { zone: name, tasks });
            }
        }

        tracing::debug!(
            system = report.system.len(),
            zones = report.zones.len(),
            cancelled = report.cancelled,
            "pending tasks processed"
        );
        report
    }

    /// Drain the history list's queue.
    pub fn drain_history_queue(&mut self) -> Vec<Task> {
        self.history.drain_pending()
    }

    /// Drain the recent buffer's queue.
    pub fn drain_recent_queue(&mut self) -> Vec<Task> {
        self.recent.drain_pending()
    }

    /// Remove the oldest reading from the recent buffer, freeing a slot.
    pub fn evict_recent(&mut self) -> Option<Arc<Reading>> {
        self.recent.dequeue()
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The zone hierarchy.
    #[must_use]
    pub fn hierarchy(&self) -> &HierarchyTree {
        &self.hierarchy
    }

    /// The history list.
    #[must_use]
    pub fn history(&self) -> &HistoryList {
        &self.history
    }

    /// The recent buffer.
    #[must_use]
    pub fn recent(&self) -> &RecentBuffer {
        &self.recent
    }

    /// The system-wide queue.
    #[must_use]
    pub fn global_queue(&self) -> &ProcessingQueue {
        &self.global
    }

    /// Snapshot of sizes and backlogs.
    #[must_use]
    pub fn metrics(&self) -> TrackingMetrics {
        TrackingMetrics::from_system(self)
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

    fn make_reading(device: &str, consumption: f64) -> Reading {
        Reading::new(
            Utc::now(),
            consumption,
            DeviceId::new(device),
            ReadingType::new("peak"),
            Priority::Medium,
        )
    }

    fn building(capacity: usize) -> TrackingSystem {
        let mut system = TrackingSystem::with_recent_capacity(capacity).expect("system");
        system.add_zone("Floor 1", "Building").expect("floor");
        system.add_zone("Room 101", "Floor 1").expect("room");
        system
    }

    #[test]
    fn add_reading_fans_out_to_all_structures() {
        let mut system = building(4);

        let submission = system
            .add_reading(make_reading("m1", 2.5), "Room 101")
            .expect("add");

        assert!(submission.recent_accepted);
        assert_eq!(Some(submission.zone), system.hierarchy().lookup("Room 101"));
        assert_eq!(system.history().len(), 1);
        assert_eq!(system.recent().len(), 1);
        assert_eq!(system.global_queue().pending_count(), 1);
        let room = system.hierarchy().zone("Room 101").expect("room");
        assert_eq!(room.reading_count(), 1);
    }

    #[test]
    fn fan_out_shares_one_reading() {
        let mut system = building(4);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("add");

        let in_zone = &system.hierarchy().zone("Room 101").expect("room").readings()[0];
        let in_history = system.history().head().expect("head");
        let in_recent = system.recent().iter().next().expect("recent");

        assert!(Arc::ptr_eq(in_zone, in_history));
        assert!(Arc::ptr_eq(in_zone, in_recent));
    }

    #[test]
    fn unknown_zone_touches_nothing() {
        let mut system = building(4);

        let result = system.add_reading(make_reading("m1", 1.0), "Basement");

        assert_eq!(result, Err(TrackingError::ZoneNotFound("Basement".to_string())));
        assert_eq!(system.history().len(), 0);
        assert_eq!(system.recent().len(), 0);
        assert_eq!(system.global_queue().pending_count(), 0);
    }

    #[test]
    fn invalid_reading_touches_nothing() {
        let mut system = building(4);

        let result = system.add_reading(make_reading("m1", -1.0), "Room 101");

        assert!(matches!(result, Err(TrackingError::InvalidReading(_))));
        assert_eq!(system.metrics().total_pending(), 0);
    }

    #[test]
    fn full_recent_buffer_does_not_fail_submission() {
        let mut system = building(1);

        let first = system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("first");
        let second = system
            .add_reading(make_reading("m2", 1.0), "Room 101")
            .expect("second");

        assert!(first.recent_accepted);
        assert!(!second.recent_accepted);
        assert_eq!(system.recent().len(), 1);
        assert_eq!(system.history().len(), 2);
        assert_eq!(system.global_queue().pending_count(), 2);
    }

    #[test]
    fn evict_recent_reopens_the_buffer() {
        let mut system = building(1);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("first");

        let evicted = system.evict_recent().expect("evict");
        assert_eq!(evicted.device_id.as_str(), "m1");

        let second = system
            .add_reading(make_reading("m2", 1.0), "Room 101")
            .expect("second");
        assert!(second.recent_accepted);
    }

    #[test]
    fn process_all_pending_drains_global_and_zones() {
        let mut system = building(8);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("add");
        system
            .add_reading(make_reading("m2", 2.0), "Floor 1")
            .expect("add");
        system
            .add_reading(make_reading("m3", 3.0), "Room 101")
            .expect("add");

        let report = system.process_all_pending();

        assert_eq!(report.system.len(), 3);
        assert_eq!(report.zone_task_count(), 3);
        let order: Vec<_> = report.zones.iter().map(|b| b.zone.as_str()).collect();
        assert_eq!(order, vec!["Floor 1", "Room 101"]);
        assert!(report.zone("Building").is_none());
        assert_eq!(report.zone("Room 101").map(<[Task]>::len), Some(2));
        assert!(!report.cancelled);
    }

    #[test]
    fn process_all_pending_leaves_history_and_recent_queues() {
        let mut system = building(8);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("add");

        let _ = system.process_all_pending();

        assert_eq!(system.history().queue().pending_count(), 1);
        assert_eq!(system.recent().queue().pending_count(), 1);
        assert_eq!(system.drain_history_queue().len(), 1);
        assert_eq!(system.drain_recent_queue().len(), 1);
        assert_eq!(system.metrics().total_pending(), 0);
    }

    #[test]
    fn second_sweep_is_empty() {
        let mut system = building(8);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("add");

        let _ = system.process_all_pending();
        assert!(system.process_all_pending().is_empty());
    }

    #[test]
    fn cancelled_sweep_keeps_zone_backlog() {
        let mut system = building(8);
        system
            .add_reading(make_reading("m1", 1.0), "Room 101")
            .expect("add");
        let cancel = AtomicBool::new(true);

        let report = system.process_all_pending_until(&cancel);

        assert!(report.cancelled);
        assert_eq!(report.system.len(), 1);
        assert!(report.zones.is_empty());
        assert_eq!(system.metrics().zone_pending, 1);

        cancel.store(false, Ordering::Release);
        let resumed = system.process_all_pending_until(&cancel);
        assert!(!resumed.cancelled);
        assert_eq!(resumed.zone_task_count(), 1);
    }

    #[test]
    fn metrics_reflect_structure_sizes() {
        let mut system = building(2);
        for (device, kwh) in [("a", 1.5), ("b", 2.5), ("c", 1.0)] {
            system
                .add_reading(make_reading(device, kwh), "Room 101")
                .expect("add");
        }

        let metrics = system.metrics();

        assert_eq!(metrics.zone_count, 3);
        assert_eq!(metrics.reading_count, 3);
        assert_eq!(metrics.recent_len, 2);
        assert_eq!(metrics.recent_capacity, 2);
        assert_eq!(metrics.system_pending, 3);
        assert_eq!(metrics.zone_pending, 3);
        assert_eq!(metrics.history_pending, 3);
        assert_eq!(metrics.recent_pending, 2);
        assert!((metrics.total_consumption - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_config_rejected() {
        assert!(matches!(
            TrackingSystem::with_recent_capacity(0),
            Err(TrackingError::InvalidConfig(_))
        ));
    }
}
