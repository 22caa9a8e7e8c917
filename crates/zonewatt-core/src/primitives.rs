//! # Engine Primitives
//!
//! Hardcoded constants for the zonewatt engine.
//!
//! These are compiled into the binary and are immutable at runtime.

/// Name of the root zone every hierarchy starts with.
///
/// The root is created with the tree, has no parent, and is always
/// registered under this name.
pub const ROOT_ZONE: &str = "Building";

/// Default capacity of the recent-readings buffer.
///
/// One slot per hour of a day of hourly readings.
pub const DEFAULT_RECENT_CAPACITY: usize = 24;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for zone names.
///
/// Names longer than this are rejected by `HierarchyTree::add_zone`.
pub const MAX_ZONE_NAME_LENGTH: usize = 256;

/// Maximum length for device identifiers and reading type tags.
pub const MAX_TAG_LENGTH: usize = 256;

/// Maximum number of readings accepted from a single input file.
///
/// Files with more entries are rejected before anything is ingested.
pub const MAX_READINGS_PER_FILE: usize = 100_000;
