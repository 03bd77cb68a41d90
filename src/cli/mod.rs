//! CLI module for batchconv
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

use crate::utils::logging::LogLevel;

pub mod args;
pub mod commands;

pub use args::{ConvertArgs, InspectArgs, ValidateArgs};

/// batchconv - batch video conversion and upload
///
/// Converts every matching video under a directory with a fixed two-pass H.264 profile,
/// mirrors the tree into a timestamped destination, logs per-file metadata and uploads
/// the result over FTP.
#[derive(Parser, Debug)]
#[command(name = "batchconv")]
#[command(about = "Batch video conversion with per-file overrides and FTP upload")]
#[command(version)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true, value_parser = LogLevel::parse)]
    pub log_level: LogLevel,

    /// Emit logs and progress as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every matching file, then upload the results
    Convert(ConvertArgs),
    /// Print the metadata summary of one media file
    Inspect(InspectArgs),
    /// Load and validate a configuration file without converting
    Validate(ValidateArgs),
}
