//! # Processing Report
//!
//! Output of a `TrackingSystem` drain sweep.

use crate::Task;
use serde::Serialize;

/// Tasks drained from one zone during a sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneBatch {
    /// Zone name.
    pub zone: String,
    /// Tasks drained from the zone's queue, in drain order.
    pub tasks: Vec<Task>,
}

/// Result of `process_all_pending`.
///
/// `zones` follows registry order and only lists zones that had pending
/// tasks.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProcessingReport {
    /// Tasks drained from the system-wide queue.
    pub system: Vec<Task>,
    /// Per-zone batches.
    pub zones: Vec<ZoneBatch>,
    /// Set when a cancellation request stopped the sweep before every zone
    /// was drained.
    pub cancelled: bool,
}

impl ProcessingReport {
    /// Tasks drained from the named zone, if it had any.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&[Task]> {
        self.zones
            .iter()
            .find(|batch| batch.zone == name)
            .map(|batch| batch.tasks.as_slice())
    }

    /// Number of tasks drained across all zones.
    #[must_use]
    pub fn zone_task_count(&self) -> usize {
        self.zones.iter().map(|batch| batch.tasks.len()).sum()
    }

    /// Number of tasks drained in total.
    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.system.len().saturating_add(self.zone_task_count())
    }

    /// Check if the sweep drained nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.system.is_empty() && self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report() {
        let report = ProcessingReport::default();
        assert!(report.is_empty());
        assert_eq!(report.total_tasks(), 0);
        assert!(report.zone("Building").is_none());
    }

    #[test]
    fn serializes_zone_batches_in_order() {
        let report = ProcessingReport {
            system: Vec::new(),
            zones: vec![
                ZoneBatch {
                    zone: "Floor 1".to_string(),
                    tasks: Vec::new(),
                },
                ZoneBatch {
                    zone: "Attic".to_string(),
                    tasks: Vec::new(),
                },
            ],
            cancelled: false,
        };

        let json = serde_json::to_string(&report).expect("encode");
        let floor = json.find("Floor 1").expect("floor");
        let attic = json.find("Attic").expect("attic");
        assert!(floor < attic);
        assert!(json.contains("\"cancelled\":false"));
    }
}
