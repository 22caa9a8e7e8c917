//! # Input Files
//!
//! Loading of readings files and shared file checks.
//!
//! A readings file is a JSON array of records:
//!
//! ```json
//! [
//!   { "zone": "Room 101", "consumption": 1.5, "device_id": "meter-1",
//!     "reading_type": "peak", "priority": "HIGH",
//!     "timestamp": "2026-03-01T08:00:00Z" }
//! ]
//! ```
//!
//! `timestamp` defaults to the time of loading and `priority` to `MEDIUM`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zonewatt_core::primitives::MAX_READINGS_PER_FILE;
use zonewatt_core::{DeviceId, Priority, Reading, ReadingType, TrackingError};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a readings file (64 MB).
pub const MAX_READINGS_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Maximum size of a site configuration file (1 MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Resolve `path` to an existing regular file.
pub fn validate_file_path(path: &Path) -> Result<PathBuf, TrackingError> {
    let canonical = path.canonicalize().map_err(|e| {
        TrackingError::Io(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(TrackingError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Reject files larger than `max_size` bytes before reading them.
pub fn validate_file_size(path: &Path, max_size: u64) -> Result<(), TrackingError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| TrackingError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(TrackingError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate and read a whole file.
pub fn read_checked(path: &Path, max_size: u64) -> Result<Vec<u8>, TrackingError> {
    let validated = validate_file_path(path)?;
    validate_file_size(&validated, max_size)?;
    std::fs::read(&validated).map_err(|e| TrackingError::Io(format!("Read file: {}", e)))
}

// =============================================================================
// READING RECORDS
// =============================================================================

/// One entry of a readings file: a reading plus the zone it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingRecord {
    /// Target zone name.
    pub zone: String,
    /// Measurement time; the load time when omitted.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Consumed energy in kWh.
    pub consumption: f64,
    /// Producing device.
    pub device_id: String,
    /// Reading category tag.
    pub reading_type: String,
    /// Urgency; `MEDIUM` when omitted.
    #[serde(default)]
    pub priority: Priority,
}

impl ReadingRecord {
    /// Build the reading, stamping `now` when the record has no timestamp.
    #[must_use]
    pub fn to_reading(&self, now: DateTime<Utc>) -> Reading {
        Reading::new(
            self.timestamp.unwrap_or(now),
            self.consumption,
            DeviceId::new(self.device_id.as_str()),
            ReadingType::new(self.reading_type.as_str()),
            self.priority,
        )
    }
}

/// Parse readings records from JSON bytes.
///
/// # Errors
/// `Serialization` if the bytes are not a JSON array of records or the array
/// holds more than `MAX_READINGS_PER_FILE` entries.
pub fn parse_readings(bytes: &[u8]) -> Result<Vec<ReadingRecord>, TrackingError> {
    let records: Vec<ReadingRecord> = serde_json::from_slice(bytes)
        .map_err(|e| TrackingError::Serialization(format!("Invalid readings file: {}", e)))?;

    if records.len() > MAX_READINGS_PER_FILE {
        return Err(TrackingError::Serialization(format!(
            "Reading count {} exceeds maximum allowed {}",
            records.len(),
            MAX_READINGS_PER_FILE
        )));
    }

    Ok(records)
}

/// Load a readings file from disk.
pub fn load_readings(path: &Path) -> Result<Vec<ReadingRecord>, TrackingError> {
    tracing::info!("Loading readings from {:?}", path);
    let bytes = read_checked(path, MAX_READINGS_FILE_SIZE)?;
    parse_readings(&bytes)
}
