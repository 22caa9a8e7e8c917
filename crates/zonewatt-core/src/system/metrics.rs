//! # Tracking Metrics
//!
//! Point-in-time counters over a `TrackingSystem`.

use super::tracker::TrackingSystem;
use serde::{Deserialize, Serialize};

/// Snapshot of structure sizes and queue backlogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingMetrics {
    /// Registered zones, root included.
    pub zone_count: usize,
    /// Readings recorded in the history list.
    pub reading_count: usize,
    /// Readings held by the recent buffer.
    pub recent_len: usize,
    /// Capacity of the recent buffer.
    pub recent_capacity: usize,
    /// Pending tasks on the system-wide queue.
    pub system_pending: usize,
    /// Pending tasks summed over every zone queue.
    pub zone_pending: usize,
    /// Pending tasks on the history list's queue.
    pub history_pending: usize,
    /// Pending tasks on the recent buffer's queue.
    pub recent_pending: usize,
    /// Consumption summed over every zone, in kWh.
    pub total_consumption: f64,
}

impl TrackingMetrics {
    /// Compute metrics from a tracking system.
    #[must_use]
    pub fn from_system(system: &TrackingSystem) -> Self {
        let hierarchy = system.hierarchy();
        let zone_pending = hierarchy
            .zones()
            .map(|zone| zone.queue().pending_count())
            .sum();
        let total_consumption = hierarchy
            .subtree_consumption(hierarchy.root().name())
            .unwrap_or_default();

        Self {
            zone_count: hierarchy.zone_count(),
            reading_count: system.history().len(),
            recent_len: system.recent().len(),
            recent_capacity: system.recent().capacity(),
            system_pending: system.global_queue().pending_count(),
            zone_pending,
            history_pending: system.history().queue().pending_count(),
            recent_pending: system.recent().queue().pending_count(),
            total_consumption,
        }
    }

    /// Pending tasks across every queue in the system.
    #[must_use]
    pub fn total_pending(&self) -> usize {
        self.system_pending
            .saturating_add(self.zone_pending)
            .saturating_add(self.history_pending)
            .saturating_add(self.recent_pending)
    }
}
