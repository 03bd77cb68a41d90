//! Run-log summaries of media files

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ConvertResult;
use crate::ports::{FsPort, ProbePort};
use crate::probe::StreamBlock;
use crate::utils::Utils;

/// Size, video bitrate and audio presence of one media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSummary {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Bitrate of the last video stream, `None` when not reported
    pub video_bitrate_kbps: Option<u64>,
    pub has_audio: bool,
}

impl MediaSummary {
    /// Summarize already probed stream blocks
    pub fn from_streams(path: impl Into<PathBuf>, size_bytes: u64, streams: &[StreamBlock]) -> Self {
        let video_bitrate_kbps = streams
            .iter()
            .filter(|s| s.is_video())
            .last()
            .and_then(StreamBlock::bit_rate)
            .filter(|b| *b >= 0.0)
            .map(|b| (b / 1024.0).round() as u64);

        Self {
            path: path.into(),
            size_bytes,
            video_bitrate_kbps,
            has_audio: streams.iter().any(StreamBlock::is_audio),
        }
    }

    pub fn size_label(&self) -> String {
        format!("{}MB", Utils::format_megabytes(self.size_bytes))
    }

    pub fn bitrate_label(&self) -> String {
        match self.video_bitrate_kbps {
            Some(kbps) => format!("{} kb/s", kbps),
            None => "unknown".to_string(),
        }
    }

    pub fn audio_label(&self) -> &'static str {
        if self.has_audio {
            "with audio"
        } else {
            "no audio"
        }
    }
}

impl fmt::Display for MediaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.path.display(),
            self.size_label(),
            self.bitrate_label(),
            self.audio_label()
        )
    }
}

/// Probes a file and builds its [`MediaSummary`]
pub struct MetadataSummarizer {
    probe: Arc<dyn ProbePort>,
    fs: Arc<dyn FsPort>,
}

impl MetadataSummarizer {
    pub fn new(probe: Arc<dyn ProbePort>, fs: Arc<dyn FsPort>) -> Self {
        Self { probe, fs }
    }

    pub async fn summarize(&self, path: &Path) -> ConvertResult<MediaSummary> {
        let size_bytes = self.fs.file_size(path).await?;
        let streams = self.probe.probe_streams(path).await?;
        debug!("{} stream(s) reported for {}", streams.len(), path.display());

        let summary = MediaSummary::from_streams(path, size_bytes, &streams);
        info!("Summary: {}", summary);
        Ok(summary)
    }
}
