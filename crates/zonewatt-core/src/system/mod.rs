//! # System Module
//!
//! The tracking aggregate, its processing sweep, and the metrics taken over
//! it.

mod metrics;
mod report;
mod tracker;

pub use metrics::TrackingMetrics;
pub use report::{ProcessingReport, ZoneBatch};
pub use tracker::{Submission, TrackingSystem};
