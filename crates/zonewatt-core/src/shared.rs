//! # Shared Tracker
//!
//! Thread-safe handle over a `TrackingSystem`.
//!
//! Every operation takes the single lock for its whole duration, so the
//! four-way fan-out of `add_reading` and a full sweep are each observed
//! atomically by other threads.

use crate::config::TrackerConfig;
use crate::system::{ProcessingReport, Submission, TrackingMetrics, TrackingSystem};
use crate::{Reading, TrackingError, ZoneId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Cloneable, lock-guarded tracking system.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<TrackingSystem>>,
}

impl SharedTracker {
    /// Wrap an existing system.
    #[must_use]
    pub fn new(system: TrackingSystem) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    /// Build a system from configuration and wrap it.
    pub fn with_config(config: &TrackerConfig) -> Result<Self, TrackingError> {
        TrackingSystem::with_config(config).map(Self::new)
    }

    /// Register a zone. See `TrackingSystem::add_zone`.
    pub fn add_zone(&self, name: &str, parent: &str) -> Result<ZoneId, TrackingError> {
        self.inner.lock().add_zone(name, parent)
    }

    /// Record a reading. See `TrackingSystem::add_reading`.
    pub fn add_reading(
        &self,
        reading: impl Into<Arc<Reading>>,
        zone: &str,
    ) -> Result<Submission, TrackingError> {
        self.inner.lock().add_reading(reading, zone)
    }

    /// Run a full sweep under the lock.
    pub fn process_all_pending(&self) -> ProcessingReport {
        self.inner.lock().process_all_pending()
    }

    /// Run a cancellable sweep under the lock.
    pub fn process_all_pending_until(&self, cancel: &AtomicBool) -> ProcessingReport {
        self.inner.lock().process_all_pending_until(cancel)
    }

    /// Current metrics.
    #[must_use]
    pub fn metrics(&self) -> TrackingMetrics {
        self.inner.lock().metrics()
    }

    /// Run `f` against the system while holding the lock.
    pub fn inspect<T>(&self, f: impl FnOnce(&TrackingSystem) -> T) -> T {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceId, Priority, ReadingType};
    use chrono::Utc;
    use std::thread;

    #[test]
    fn concurrent_submissions_keep_structures_in_step() {
        let tracker = SharedTracker::with_config(&TrackerConfig {
            recent_capacity: 1000,
        })
        .expect("tracker");
        tracker.add_zone("Floor 1", "Building").expect("zone");

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let tracker = tracker.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let reading = Reading::new(
                            Utc::now(),
                            1.0,
                            DeviceId::new(format!("w{worker}-{i}")),
                            ReadingType::new("live"),
                            Priority::Low,
                        );
                        tracker.add_reading(reading, "Floor 1").expect("add");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }

        let metrics = tracker.metrics();
        assert_eq!(metrics.reading_count, 100);
        assert_eq!(metrics.recent_len, 100);
        assert_eq!(metrics.system_pending, 100);
        assert_eq!(metrics.zone_pending, 100);

        let report = tracker.process_all_pending();
        assert_eq!(report.total_tasks(), 200);
        assert_eq!(tracker.inspect(|s| s.global_queue().pending_count()), 0);
    }

    #[test]
    fn errors_pass_through() {
        let tracker = SharedTracker::default();
        assert_eq!(
            tracker.add_zone("Floor 1", "Nowhere"),
            Err(TrackingError::ZoneNotFound("Nowhere".to_string()))
        );
    }
}
