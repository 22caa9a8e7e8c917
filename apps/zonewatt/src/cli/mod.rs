//! # zonewatt CLI Module
//!
//! This module implements the CLI interface for zonewatt.
//!
//! ## Available Commands
//!
//! - `run` - Ingest readings and process every pending task
//! - `tree` - Show the zone hierarchy with consumption rollups
//! - `sort` - Show readings ordered by priority
//! - `status` - Ingest readings and show tracker metrics

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zonewatt_core::TrackingError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// zonewatt - Zone Energy Tracker
///
/// Records energy readings against a hierarchy of zones and processes the
/// analysis tasks each reading produces.
#[derive(Parser, Debug)]
#[command(name = "zonewatt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the site configuration (TOML)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest readings, then process all pending tasks
    Run {
        /// Path to the readings file (JSON)
        #[arg(short, long)]
        readings: PathBuf,
    },

    /// Show the zone hierarchy
    Tree {
        /// Readings to ingest before rendering the rollups
        #[arg(short, long)]
        readings: Option<PathBuf>,
    },

    /// Show readings ordered by priority, highest first
    Sort {
        /// Path to the readings file (JSON)
        #[arg(short, long)]
        readings: PathBuf,
    },

    /// Ingest readings without processing and show metrics
    Status {
        /// Path to the readings file (JSON)
        #[arg(short, long)]
        readings: Option<PathBuf>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TrackingError> {
    let config = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run { readings }) => cmd_run(config, &readings, json_mode),
        Some(Commands::Tree { readings }) => cmd_tree(config, readings.as_deref(), json_mode),
        Some(Commands::Sort { readings }) => cmd_sort(&readings, json_mode),
        Some(Commands::Status { readings }) => {
            cmd_status(config, readings.as_deref(), json_mode)
        }
        None => {
            // No subcommand - show the hierarchy by default
            cmd_tree(config, None, json_mode)
        }
    }
}
