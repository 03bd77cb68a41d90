//! FFprobe adapter for media stream probing
//!
//! Runs `ffprobe -show_streams` and scans its standard output into stream blocks.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::engine::commands::probe_streams;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::probe::{parse_stream_blocks, StreamBlock};

/// FFprobe-based probe adapter
pub struct FfprobeAdapter;

impl FfprobeAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfprobeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProbePort for FfprobeAdapter {
    async fn probe_streams(&self, file_path: &Path) -> ConvertResult<Vec<StreamBlock>> {
        let command = probe_streams(file_path);
        debug!("Executing: {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ConvertError::io(&command.program, e))?;

        let blocks = parse_stream_blocks(&String::from_utf8_lossy(&output.stdout));
        if blocks.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .last()
                .unwrap_or("no stream reported")
                .to_string();
            return Err(ConvertError::ProbeFailure {
                path: file_path.display().to_string(),
                message,
            });
        }

        debug!("{} stream(s) in {}", blocks.len(), file_path.display());
        Ok(blocks)
    }
}
