//! # Priority Sorter
//!
//! Orders readings by descending priority for callers that want
//! urgency order. The processing queues never use it.

use crate::Reading;
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Stateless selection sort over readings.
pub struct PrioritySorter;

impl PrioritySorter {
    /// Sort readings in place, highest priority first.
    ///
    /// Selection sort: for each position, the suffix is scanned for the first
    /// reading of the highest remaining rank, and that reading is rotated into
    /// place. Rotation shifts the skipped readings right by one instead of
    /// swapping, so readings of equal priority keep their relative order.
    ///
    /// O(n²) comparisons. Returns the same slice.
    pub fn sort_by_priority<R: Borrow<Reading>>(readings: &mut [R]) -> &mut [R] {
        let len = readings.len();
        for i in 0..len.saturating_sub(1) {
            let mut max_idx = i;
            for j in (i + 1)..len {
                let candidate = readings[j].borrow().priority;
                let current = readings[max_idx].borrow().priority;
                if candidate.compare(current) == Ordering::Greater {
                    max_idx = j;
                }
            }
            if max_idx != i {
                readings[i..=max_idx].rotate_right(1);
            }
        }
        readings
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
    use std::sync::Arc;

    fn make_reading(device: &str, priority: Priority) -> Reading {
        Reading::new(
            Utc::now(),
            1.0,
            DeviceId::new(device),
            ReadingType::new("peak"),
            priority,
        )
    }

    fn priorities(readings: &[Reading]) -> Vec<Priority> {
        readings.iter().map(|r| r.priority).collect()
    }

    #[test]
    fn sorts_descending_by_rank() {
        let mut readings = vec![
            make_reading("a", Priority::Low),
            make_reading("b", Priority::High),
            make_reading("c", Priority::Medium),
            make_reading("d", Priority::Critical),
        ];

        PrioritySorter::sort_by_priority(&mut readings);

        assert_eq!(
            priorities(&readings),
            vec![
                Priority::Critical,
                Priority::High,
                Priority::Medium,
                Priority::Low
            ]
        );
    }

    #[test]
    fn ties_keep_relative_order() {
        let mut readings = vec![
            make_reading("a", Priority::High),
            make_reading("b", Priority::High),
            make_reading("c", Priority::Low),
        ];

        PrioritySorter::sort_by_priority(&mut readings);

        let devices: Vec<_> = readings.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(devices, vec!["a", "b", "c"]);
    }

    #[test]
    fn later_tie_does_not_jump_ahead() {
        let mut readings = vec![
            make_reading("m1", Priority::Medium),
            make_reading("m2", Priority::Medium),
            make_reading("h", Priority::High),
        ];

        PrioritySorter::sort_by_priority(&mut readings);

        let devices: Vec<_> = readings.iter().map(|r| r.device_id.as_str()).collect();
        assert_eq!(devices, vec!["h", "m1", "m2"]);
    }

    #[test]
    fn empty_and_single_are_noops() {
        let mut empty: Vec<Reading> = Vec::new();
        assert!(PrioritySorter::sort_by_priority(&mut empty).is_empty());

        let mut single = vec![make_reading("only", Priority::Low)];
        PrioritySorter::sort_by_priority(&mut single);
        assert_eq!(single[0].device_id.as_str(), "only");
    }

    #[test]
    fn sorts_shared_readings() {
        let mut readings = vec![
            Arc::new(make_reading("a", Priority::Medium)),
            Arc::new(make_reading("b", Priority::Critical)),
        ];

        let sorted = PrioritySorter::sort_by_priority(&mut readings);

        assert_eq!(sorted[0].device_id.as_str(), "b");
        assert_eq!(sorted[1].device_id.as_str(), "a");
    }
}
