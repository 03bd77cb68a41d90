//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Configuration file (YAML, or TOML when it ends in .toml)
    #[arg(short, long, default_value = "config.yml")]
    pub config: PathBuf,

    /// Directory the converted-<timestamp> tree is created in
    #[arg(short, long, default_value = ".")]
    pub output_root: PathBuf,

    /// Convert only, skip the upload pass
    #[arg(long)]
    pub no_upload: bool,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration file to check
    #[arg(short, long, default_value = "config.yml")]
    pub config: PathBuf,
}
