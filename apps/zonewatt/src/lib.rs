//! # zonewatt
//!
//! Command-line front end for the zonewatt tracking engine.
//!
//! - `cli` - argument parsing and command implementations
//! - `config` - site configuration (TOML)
//! - `input` - readings files (JSON) and file checks

pub mod cli;
pub mod config;
pub mod input;
