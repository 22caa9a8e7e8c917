//! # zonewatt-core
//!
//! The energy tracking engine for zonewatt.
//!
//! Readings arrive tagged with a zone name. Each accepted reading is shared
//! (one `Arc<Reading>`) by four owners, and each owner enqueues its own
//! analysis task:
//!
//! - the zone node it was attached to (`consumption_analysis`)
//! - the chronological `HistoryList` (`historical_analysis`)
//! - the bounded `RecentBuffer` (`recent_analysis`, skipped when full)
//! - the system-wide queue (`system_analysis`)
//!
//! "Processing" a task only marks it processed and timestamps it. Queues are
//! strictly FIFO; priority affects nothing except `PrioritySorter`.
//!
//! ## Constraints
//!
//! - Synchronous and single-owner: `TrackingSystem` takes `&mut self`;
//!   `SharedTracker` wraps it in one lock for multi-threaded callers
//! - Deterministic: zone iteration follows creation order
//! - No persistence, no network

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod hierarchy;
pub mod history;
pub mod primitives;
pub mod queue;
pub mod recent;
pub mod shared;
pub mod sorter;
pub mod system;
pub mod types;
pub mod zone;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DeviceId, Priority, Reading, ReadingType, Task, TaskKind, TaskStatus, TrackingError, ZoneId,
};

// =============================================================================
// RE-EXPORTS: Structures
// =============================================================================

pub use config::TrackerConfig;
pub use hierarchy::HierarchyTree;
pub use history::{HistoryIter, HistoryList};
pub use queue::ProcessingQueue;
pub use recent::RecentBuffer;
pub use shared::SharedTracker;
pub use sorter::PrioritySorter;
pub use zone::ZoneNode;

// =============================================================================
// RE-EXPORTS: System (from system module)
// =============================================================================

pub use system::{ProcessingReport, Submission, TrackingMetrics, TrackingSystem, ZoneBatch};
