//! # Core Type Definitions
//!
//! This module contains the value types shared by every structure in the engine:
//! - Zone handles (`ZoneId`)
//! - Reading representation (`Reading`, `Priority`, `DeviceId`, `ReadingType`)
//! - Processing records (`Task`, `TaskKind`, `TaskStatus`)
//! - Error types (`TrackingError`)
//!
//! ## Sharing
//!
//! A `Reading` is immutable once created. The engine wraps each accepted reading
//! in an `Arc` so the zone node, history list, recent buffer and every queue hold
//! the same read-only value.

use crate::primitives::MAX_TAG_LENGTH;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// ZONE HANDLE
// =============================================================================

/// Stable handle of a zone inside its `HierarchyTree` arena.
///
/// Handles are assigned in creation order; the root is always `ZoneId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

impl ZoneId {
    /// Handle of the root zone.
    pub const ROOT: ZoneId = ZoneId(0);

    /// Get the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

// =============================================================================
// PRIORITY
// =============================================================================

/// Urgency tag carried by every reading.
///
/// The variants form a closed, totally ordered set. Ordering is defined once,
/// by [`Priority::rank`], and every caller that orders priorities goes through
/// [`Priority::compare`]. There is no `Ord` impl; processing queues are FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// All priorities from lowest to highest rank.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    /// Numeric rank: LOW=1, MEDIUM=2, HIGH=3, CRITICAL=4.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Critical => 4,
        }
    }

    /// Total order over priorities by rank.
    #[must_use]
    pub fn compare(self, other: Priority) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// Uppercase label as it appears in readings files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// =============================================================================
// READING COMPONENTS
// =============================================================================

/// Identifier of the metering device that produced a reading.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    /// Create a new device identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form reading category, e.g. `"peak"` or `"off-peak"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadingType(pub String);

impl ReadingType {
    /// Create a new reading type tag.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// READING
// =============================================================================

/// One energy measurement.
///
/// Readings are never mutated after construction. `timestamp` and `priority`
/// may be omitted in serialized input; they default to the time of parsing and
/// `MEDIUM` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the measurement was taken.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Consumed energy in kWh. Finite and non-negative once validated.
    pub consumption: f64,
    /// The device that produced the measurement.
    pub device_id: DeviceId,
    /// Reading category tag.
    pub reading_type: ReadingType,
    /// Urgency of the reading.
    #[serde(default)]
    pub priority: Priority,
}

impl Reading {
    /// Create a new reading.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        consumption: f64,
        device_id: DeviceId,
        reading_type: ReadingType,
        priority: Priority,
    ) -> Self {
        Self {
            timestamp,
            consumption,
            device_id,
            reading_type,
            priority,
        }
    }

    /// Validate a reading before it enters the engine.
    ///
    /// A reading is valid if:
    /// - consumption is finite and not negative
    /// - device id is non-empty and within `MAX_TAG_LENGTH`
    /// - reading type is non-empty and within `MAX_TAG_LENGTH`
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !self.consumption.is_finite() || self.consumption < 0.0 {
            return Err(TrackingError::InvalidReading(format!(
                "consumption must be a non-negative number, got {}",
                self.consumption
            )));
        }

        let device = self.device_id.as_str();
        if device.is_empty() || device.len() > MAX_TAG_LENGTH {
            return Err(TrackingError::InvalidReading(format!(
                "device id must be 1..={} bytes",
                MAX_TAG_LENGTH
            )));
        }

        let kind = self.reading_type.as_str();
        if kind.is_empty() || kind.len() > MAX_TAG_LENGTH {
            return Err(TrackingError::InvalidReading(format!(
                "reading type must be 1..={} bytes",
                MAX_TAG_LENGTH
            )));
        }

        Ok(())
    }
}

// =============================================================================
// TASK
// =============================================================================

/// The kind of deferred handling a task represents.
///
/// Each owning structure enqueues exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Enqueued by a zone node for each reading attached to it.
    ConsumptionAnalysis,
    /// Enqueued by the history list on append.
    HistoricalAnalysis,
    /// Enqueued by the recent buffer on an accepted enqueue.
    RecentAnalysis,
    /// Enqueued on the system-wide queue for every accepted reading.
    SystemAnalysis,
}

impl TaskKind {
    /// Wire label of the task kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TaskKind::ConsumptionAnalysis => "consumption_analysis",
            TaskKind::HistoricalAnalysis => "historical_analysis",
            TaskKind::RecentAnalysis => "recent_analysis",
            TaskKind::SystemAnalysis => "system_analysis",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle of a task. The transition is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Processed,
}

/// Record of scheduling and completing the handling of one reading.
///
/// Tasks are only created by `ProcessingQueue::enqueue` and only completed by
/// draining the queue that created them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    reading: Arc<Reading>,
    kind: TaskKind,
    status: TaskStatus,
    processed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub(crate) fn new(reading: Arc<Reading>, kind: TaskKind) -> Self {
        Self {
            reading,
            kind,
            status: TaskStatus::Pending,
            processed_at: None,
        }
    }

    /// Move the task to `Processed`. A second call is a no-op, so the
    /// processed timestamp is written exactly once.
    pub(crate) fn mark_processed(&mut self, at: DateTime<Utc>) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::Processed;
            self.processed_at = Some(at);
        }
    }

    /// The reading this task handles.
    #[must_use]
    pub fn reading(&self) -> &Arc<Reading> {
        &self.reading
    }

    /// The kind of handling.
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// When the task was processed, if it has been.
    #[must_use]
    pub fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Check if the task has been processed.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.status == TaskStatus::Processed
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the tracking engine.
///
/// Every expected edge condition is reported through this enum or an `Option`;
/// the engine never panics on caller input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackingError {
    /// The named zone is not registered.
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// A zone with this name is already registered.
    #[error("Zone already exists: {0}")]
    DuplicateZone(String),

    /// The zone name is empty or too long.
    #[error("Invalid zone name: {0:?}")]
    InvalidZoneName(String),

    /// The recent buffer is at capacity and rejected the reading.
    #[error("Recent buffer full (capacity {capacity})")]
    RecentBufferFull { capacity: usize },

    /// The reading failed validation.
    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while loading input.
    #[error("I/O error: {0}")]
    Io(String),

    /// Input could not be parsed or output could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// TESTS
// =============================================================================
