//! Effective encoding parameters of one input file

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::model::{EncodingJob, FileOverride, GlobalConfig, Resolution};
use crate::domain::rules::RateRules;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::ProbePort;
use crate::probe::first_dimensions;
use crate::utils::path::PathMapper;

/// Merges global settings with an optional per-file override into an [`EncodingJob`].
///
/// The probe is only consulted when the override does not fix the resolution.
pub struct JobResolver {
    probe: Arc<dyn ProbePort>,
}

impl JobResolver {
    pub fn new(probe: Arc<dyn ProbePort>) -> Self {
        Self { probe }
    }

    pub async fn resolve(
        &self,
        global: &GlobalConfig,
        mapper: &PathMapper,
        source: &Path,
        file_override: Option<&FileOverride>,
    ) -> ConvertResult<EncodingJob> {
        let resolution = match file_override.and_then(|o| o.resolution) {
            Some(resolution) => resolution,
            None => self.probe_resolution(source).await?,
        };

        let rates = match file_override.and_then(|o| o.bitrate) {
            Some(bitrate) => RateRules::from_bitrate(bitrate),
            None => RateRules::from_resolution(&resolution, global.bitrate_ratio),
        };

        let job = EncodingJob {
            source_path: source.to_path_buf(),
            output_path: mapper.output_path(source),
            resolution,
            bitrate: rates.bitrate,
            maxrate: rates.maxrate,
            has_audio: file_override.and_then(|o| o.audio).unwrap_or(true),
            excluded: file_override.and_then(|o| o.exclude).unwrap_or(false),
            trim: file_override.and_then(|o| o.trim),
        };

        info!("Resolution: {}", job.resolution);
        info!("Bitrate: {}M, Maxrate: {}M", job.bitrate, job.maxrate);
        info!("Audio presence: {}", job.has_audio);
        Ok(job)
    }

    async fn probe_resolution(&self, source: &Path) -> ConvertResult<Resolution> {
        let streams = self.probe.probe_streams(source).await?;
        let (width, height) =
            first_dimensions(&streams).ok_or_else(|| ConvertError::ProbeFailure {
                path: source.display().to_string(),
                message: "no stream reports width and height".to_string(),
            })?;

        Resolution::new(width, height).ok_or_else(|| ConvertError::InvalidResolution {
            path: source.display().to_string(),
            resolution: format!("{}x{}", width, height),
        })
    }
}
