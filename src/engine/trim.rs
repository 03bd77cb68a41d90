//! Post-encode cut of the produced output

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::TrimRange;
use crate::engine::commands::EncoderCommands;
use crate::engine::progress::ProgressKind;
use crate::engine::ToolRunner;
use crate::error::ConvertResult;
use crate::ports::FsPort;
use crate::utils::path::sibling_temp_path;
use crate::utils::time::TimeParser;

/// Replaces an encoded output with its `[start, end]` segment.
///
/// The encoder cannot read and write one file, so the cut goes to a sibling
/// `<stem>.trim.<ext>` which is then moved over the output.
pub struct TrimStep {
    tools: ToolRunner,
    fs: Arc<dyn FsPort>,
}

impl TrimStep {
    pub fn new(tools: ToolRunner, fs: Arc<dyn FsPort>) -> Self {
        Self { tools, fs }
    }

    pub async fn apply(&self, output: &Path, range: &TrimRange) -> ConvertResult<()> {
        info!(
            "Cutting {} to {} - {}",
            output.display(),
            TimeParser::format_clock(range.start),
            TimeParser::format_clock(range.end)
        );

        let temp = sibling_temp_path(output, "trim");
        let cut = self
            .tools
            .run("Cutting", EncoderCommands::trim(output, &temp, range), ProgressKind::Encoder)
            .await;
        if let Err(e) = cut {
            if let Err(cleanup) = self.fs.remove_file(&temp).await {
                warn!("Could not remove {}: {}", temp.display(), cleanup);
            }
            return Err(e);
        }
        self.fs.move_file(&temp, output).await
    }
}
