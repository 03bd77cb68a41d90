//! batchconv
//!
//! Converts every video with the configured extension under `local_directory`, mirrors the
//! tree into `converted-<timestamp>/`, writes `conversion.log` and uploads everything over FTP.
//!
//! # Usage
//!
//! ```bash
//! batchconv convert --config config.yml
//! batchconv convert --config batch.toml --no-upload --output-root /srv/out
//! batchconv inspect --input clip.mp4 --json
//! batchconv validate --config config.yml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use batchconv_cli::app::container::{DefaultAppContainer, ProgressMode};
use batchconv_cli::cli::{commands, Cli, Commands};
use batchconv_cli::utils::logging::{LogFormat, LoggingConfig, LoggingSystem};

/// Main entry point for the batchconv CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingSystem::new(LoggingConfig {
        level: cli.log_level,
        format: if cli.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        },
    });
    logging.initialize().map_err(anyhow::Error::msg)?;
    logging.log_system_info();

    let container = DefaultAppContainer::new(if cli.json_logs {
        ProgressMode::Json
    } else {
        ProgressMode::Console
    });

    match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            if let Err(e) = commands::convert(&container, args).await {
                commands::report_conversion_failure(&e);
                std::process::exit(1);
            }
        }
        Commands::Inspect(args) => {
            info!("Executing inspect command");
            commands::inspect(&container, args).await?;
        }
        Commands::Validate(args) => {
            info!("Executing validate command");
            commands::validate(&container, args).await?;
        }
    }

    Ok(())
}
