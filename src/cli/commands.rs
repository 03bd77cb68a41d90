//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::container::AppContainer;
use crate::app::{ConvertRequest, InspectInteractor};
use crate::cli::args::{ConvertArgs, InspectArgs, ValidateArgs};
use crate::error::{ConvertError, ConvertResult};

const BANNER_WIDTH: usize = 76;

/// Execute the convert command
pub async fn convert(container: &dyn AppContainer, args: ConvertArgs) -> ConvertResult<()> {
    let request = ConvertRequest {
        config_path: args.config,
        output_root: args.output_root,
        upload: !args.no_upload,
    };

    let report = container.convert_interactor().execute(request).await?;
    println!("Converted {} file(s) into {}", report.summaries.len(), report.dest_root.display());
    println!("Run log: {}", report.run_log.display());
    if report.uploaded > 0 {
        println!("Uploaded {} file(s)", report.uploaded);
    }
    Ok(())
}

/// Print a failed conversion: configuration problems as a plain list, run failures
/// inside the error banner
pub fn report_conversion_failure(error: &ConvertError) {
    match error {
        ConvertError::ConfigInvalid { .. } | ConvertError::NoInputFiles { .. } => {
            eprintln!("[-] {}", error);
        }
        _ => {
            let title = " Error during conversion ";
            let side = BANNER_WIDTH.saturating_sub(title.len()) / 2;
            eprintln!("{}{}{}", "*".repeat(side), title, "*".repeat(side));
            eprintln!("{}", error);
            eprintln!("{}", "*".repeat(side * 2 + title.len()));
        }
    }
}

/// Execute the inspect command
pub async fn inspect(container: &dyn AppContainer, args: InspectArgs) -> Result<()> {
    let summary = container
        .inspect_interactor()
        .execute(&args.input)
        .await
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", InspectInteractor::to_json(&summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

/// Execute the validate command
pub async fn validate(container: &dyn AppContainer, args: ValidateArgs) -> Result<()> {
    let config = container
        .validate_interactor()
        .execute(&args.config)
        .await
        .with_context(|| format!("Configuration {} is not valid", args.config.display()))?;

    let global = &config.global;
    info!("Configuration {} is valid", args.config.display());
    println!("Configuration OK");
    println!("  local_directory:  {}", global.source_dir.display());
    println!("  extension:        {}", global.extension);
    println!("  bitrate_ratio:    {}", global.bitrate_ratio);
    println!("  ftp_server:       {}", global.ftp_server);
    println!("  upload_directory: {}", global.upload_dir);
    println!("  overrides:        {}", config.overrides.len());
    Ok(())
}
