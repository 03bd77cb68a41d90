// Inspect interactor - one-off metadata summary of a single media file

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::probe::summary::{MediaSummary, MetadataSummarizer};

/// Interactor for the media inspection use case
pub struct InspectInteractor {
    summarizer: MetadataSummarizer,
}

impl InspectInteractor {
    pub fn new(probe_port: Arc<dyn ProbePort>, fs_port: Arc<dyn FsPort>) -> Self {
        Self {
            summarizer: MetadataSummarizer::new(probe_port, fs_port),
        }
    }

    pub async fn execute(&self, input: &Path) -> ConvertResult<MediaSummary> {
        info!("Inspecting {}", input.display());
        if !input.is_file() {
            return Err(ConvertError::io(
                input,
                std::io::Error::new(std::io::ErrorKind::NotFound, "input file does not exist"),
            ));
        }
        self.summarizer.summarize(input).await
    }

    /// Summary as pretty JSON
    pub fn to_json(summary: &MediaSummary) -> ConvertResult<String> {
        serde_json::to_string_pretty(summary)
            .map_err(|e| ConvertError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}
