//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::SiteConfig;
use crate::input::{ReadingRecord, load_readings};
use chrono::Utc;
use serde::Serialize;
use std::borrow::Borrow;
use std::path::Path;
use zonewatt_core::{PrioritySorter, Reading, Task, TrackingError, TrackingSystem};

// =============================================================================
// INGESTION
// =============================================================================

/// Counts from feeding a readings file into a tracking system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Readings recorded in every structure.
    pub accepted: usize,
    /// Readings refused (unknown zone or failed validation).
    pub rejected: usize,
    /// Accepted readings the full recent buffer did not take.
    pub recent_skipped: usize,
}

/// Submit every record, logging and counting the ones that are refused.
///
/// Records without a timestamp all receive the same load time.
pub fn ingest_records(system: &mut TrackingSystem, records: &[ReadingRecord]) -> IngestSummary {
    let now = Utc::now();
    let mut summary = IngestSummary::default();

    for (index, record) in records.iter().enumerate() {
        match system.add_reading(record.to_reading(now), &record.zone) {
            Ok(submission) => {
                summary.accepted += 1;
                if !submission.recent_accepted {
                    summary.recent_skipped += 1;
                }
            }
            Err(e) => {
                tracing::warn!(index, zone = record.zone.as_str(), "Reading rejected: {}", e);
                summary.rejected += 1;
            }
        }
    }

    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        recent_skipped = summary.recent_skipped,
        "Ingestion complete"
    );
    summary
}

/// Build the configured site and ingest `readings` into it, if given.
pub fn load_site(
    config: Option<&Path>,
    readings: Option<&Path>,
) -> Result<(TrackingSystem, IngestSummary), TrackingError> {
    let mut system = SiteConfig::load_or_default(config)?.build_system()?;
    let summary = match readings {
        Some(path) => ingest_records(&mut system, &load_readings(path)?),
        None => IngestSummary::default(),
    };
    Ok((system, summary))
}

fn print_json(value: &impl Serialize) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn format_task(task: &Task) -> String {
    let reading = task.reading();
    format!(
        "{:<22} {:<16} {:<8} {:>10.3} kWh  {}",
        task.kind(),
        reading.device_id.as_str(),
        reading.priority,
        reading.consumption,
        reading.timestamp.to_rfc3339()
    )
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Ingest readings and process every pending task.
///
/// Besides the system and zone queues, the history and recent queues are
/// drained explicitly so nothing is left pending when the command exits.
pub fn cmd_run(config: Option<&Path>, readings: &Path, json_mode: bool) -> Result<(), TrackingError> {
    let (mut system, summary) = load_site(config, Some(readings))?;

    let report = system.process_all_pending();
    let history_tasks = system.drain_history_queue();
    let recent_tasks = system.drain_recent_queue();

    if json_mode {
        let output = serde_json::json!({
            "ingest": summary,
            "report": report,
            "history_tasks": history_tasks.len(),
            "recent_tasks": recent_tasks.len(),
            "metrics": system.metrics(),
        });
        print_json(&output);
        return Ok(());
    }

    println!("zonewatt Processing Report");
    println!("==========================");
    println!(
        "Readings: {} accepted, {} rejected, {} not buffered",
        summary.accepted, summary.rejected, summary.recent_skipped
    );
    println!();
    println!("System queue: {} tasks", report.system.len());
    for task in &report.system {
        println!("  {}", format_task(task));
    }
    println!();
    println!("Zone queues: {} tasks", report.zone_task_count());
    for batch in &report.zones {
        println!("  {} ({} tasks)", batch.zone, batch.tasks.len());
        for task in &batch.tasks {
            println!("    {}", format_task(task));
        }
    }
    println!();
    println!("History queue: {} tasks", history_tasks.len());
    println!("Recent queue:  {} tasks", recent_tasks.len());

    Ok(())
}

// =============================================================================
// TREE COMMAND
// =============================================================================

/// One zone in the JSON rendering of the tree.
#[derive(Debug, Serialize)]
struct TreeEntry<'a> {
    name: &'a str,
    depth: usize,
    parent: Option<&'a str>,
    reading_count: usize,
    consumption: f64,
    subtree_consumption: f64,
}

/// Show the zone hierarchy, depth first.
pub fn cmd_tree(
    config: Option<&Path>,
    readings: Option<&Path>,
    json_mode: bool,
) -> Result<(), TrackingError> {
    let (system, _) = load_site(config, readings)?;
    let hierarchy = system.hierarchy();

    let entries: Vec<TreeEntry<'_>> = hierarchy
        .walk()
        .into_iter()
        .map(|(depth, node)| TreeEntry {
            name: node.name(),
            depth,
            parent: node
                .parent()
                .and_then(|id| hierarchy.zone_by_id(id))
                .map(|parent| parent.name()),
            reading_count: node.reading_count(),
            consumption: node.total_consumption(),
            subtree_consumption: hierarchy
                .subtree_consumption(node.name())
                .unwrap_or_default(),
        })
        .collect();

    if json_mode {
        print_json(&entries);
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{}{} [{} readings, {:.3} kWh, subtree {:.3} kWh]",
            "  ".repeat(entry.depth),
            entry.name,
            entry.reading_count,
            entry.consumption,
            entry.subtree_consumption
        );
    }

    Ok(())
}

// =============================================================================
// SORT COMMAND
// =============================================================================

/// A reading kept next to the zone it was filed under.
#[derive(Debug, Serialize)]
struct ZonedReading {
    zone: String,
    #[serde(flatten)]
    reading: Reading,
}

impl Borrow<Reading> for ZonedReading {
    fn borrow(&self) -> &Reading {
        &self.reading
    }
}

/// Show readings from a file ordered by priority, highest first.
///
/// Readings of equal priority keep their file order. Zones are not checked.
pub fn cmd_sort(readings: &Path, json_mode: bool) -> Result<(), TrackingError> {
    let now = Utc::now();
    let mut entries: Vec<ZonedReading> = load_readings(readings)?
        .iter()
        .map(|record| ZonedReading {
            zone: record.zone.clone(),
            reading: record.to_reading(now),
        })
        .collect();

    PrioritySorter::sort_by_priority(&mut entries);

    if json_mode {
        print_json(&entries);
        return Ok(());
    }

    for entry in &entries {
        let reading = &entry.reading;
        println!(
            "{:<8} {:<16} {:<16} {:>10.3} kWh  {}",
            reading.priority,
            entry.zone,
            reading.device_id.as_str(),
            reading.consumption,
            reading.timestamp.to_rfc3339()
        );
    }

    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Ingest readings without processing and show tracker metrics.
pub fn cmd_status(
    config: Option<&Path>,
    readings: Option<&Path>,
    json_mode: bool,
) -> Result<(), TrackingError> {
    let (system, summary) = load_site(config, readings)?;
    let metrics = system.metrics();

    if json_mode {
        let output = serde_json::json!({
            "ingest": summary,
            "metrics": metrics,
            "total_pending": metrics.total_pending(),
        });
        print_json(&output);
        return Ok(());
    }

    println!("zonewatt Tracker Status");
    println!("=======================");
    println!("Zones:             {}", metrics.zone_count);
    println!("Readings:          {}", metrics.reading_count);
    println!(
        "Recent buffer:     {}/{}",
        metrics.recent_len, metrics.recent_capacity
    );
    println!("Total consumption: {:.3} kWh", metrics.total_consumption);
    println!();
    println!("Pending tasks");
    println!("  System:  {}", metrics.system_pending);
    println!("  Zones:   {}", metrics.zone_pending);
    println!("  History: {}", metrics.history_pending);
    println!("  Recent:  {}", metrics.recent_pending);
    println!("  Total:   {}", metrics.total_pending());

    Ok(())
}
