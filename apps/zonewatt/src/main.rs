//! # zonewatt - Zone Energy Tracker
//!
//! The main binary for the zonewatt tracking engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 apps/zonewatt (THE BINARY)                │
//! │                                                           │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────────┐  │
//! │  │    CLI      │   │ Site config  │   │ Readings file │  │
//! │  │   (clap)    │   │   (toml)     │   │ (serde_json)  │  │
//! │  └──────┬──────┘   └──────┬───────┘   └───────┬───────┘  │
//! │         └─────────────────┼───────────────────┘          │
//! │                           ▼                               │
//! │                  ┌────────────────┐                       │
//! │                  │ zonewatt-core  │                       │
//! │                  │  (THE ENGINE)  │                       │
//! │                  └────────────────┘                       │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! zonewatt --config site.toml tree
//! zonewatt --config site.toml run --readings readings.json
//! zonewatt sort --readings readings.json --json-mode
//! zonewatt --config site.toml status --readings readings.json
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zonewatt::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments first: --verbose picks the default log level.
    let cli = cli::Cli::parse();

    // Initialize tracing: ZONEWATT_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ZONEWATT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "zonewatt=debug,zonewatt_core=debug"
    } else {
        "zonewatt=info,zonewatt_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so --json-mode output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the zonewatt startup banner.
fn print_banner() {
    println!(
        r#"
  zonewatt v{}
  zone energy tracker
"#,
        env!("CARGO_PKG_VERSION")
    );
}
