//! # Tracker Configuration
//!
//! Construction-time settings for `TrackingSystem`. Immutable once the
//! system is built.

use crate::TrackingError;
use crate::primitives::DEFAULT_RECENT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Settings read once when a `TrackingSystem` is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Capacity of the recent-readings buffer.
    pub recent_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
        }
    }
}

impl TrackerConfig {
    /// Check the settings without building anything.
    pub fn validate(&self) -> Result<(), TrackingError> {
        if self.recent_capacity == 0 {
            return Err(TrackingError::InvalidConfig(
                "recent_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
