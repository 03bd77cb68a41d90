//! Per-file encode state machine
//!
//! `Start -> (Excluded | NoAudioEncode | TwoPassEncode) -> [Trim] -> Repackage -> Done`.
//! Any failing step ends the file; nothing is retried.

use std::sync::Arc;

use tracing::info;

use crate::domain::model::{EncodeBranch, EncodingJob};
use crate::engine::commands::{repackage, EncoderCommands};
use crate::engine::progress::ProgressKind;
use crate::engine::trim::TrimStep;
use crate::engine::ToolRunner;
use crate::error::ConvertResult;
use crate::ports::FsPort;

pub struct EncodeOrchestrator {
    tools: ToolRunner,
    fs: Arc<dyn FsPort>,
    trim: TrimStep,
}

impl EncodeOrchestrator {
    pub fn new(tools: ToolRunner, fs: Arc<dyn FsPort>) -> Self {
        let trim = TrimStep::new(tools.clone(), Arc::clone(&fs));
        Self { tools, fs, trim }
    }

    /// Produce `job.output_path`; returns the branch that was taken
    pub async fn execute(&self, job: &EncodingJob) -> ConvertResult<EncodeBranch> {
        let branch = job.branch();
        match branch {
            EncodeBranch::Excluded => {
                info!(
                    "Excluding '{}' from conversion, copying as is",
                    job.source_path.display()
                );
                self.fs.copy_file(&job.source_path, &job.output_path).await?;
                return Ok(branch);
            }
            EncodeBranch::NoAudio => {
                info!("Single pass conversion without audio");
                self.tools
                    .run(
                        "Encoding (no audio)",
                        EncoderCommands::without_audio(job),
                        ProgressKind::Encoder,
                    )
                    .await?;
            }
            EncodeBranch::TwoPass => {
                info!("Two pass conversion");
                self.tools
                    .run("Pass 1", EncoderCommands::pass(job, 1), ProgressKind::Encoder)
                    .await?;
                self.tools
                    .run("Pass 2", EncoderCommands::pass(job, 2), ProgressKind::Encoder)
                    .await?;
            }
        }

        if let Some(range) = &job.trim {
            self.trim.apply(&job.output_path, range).await?;
        }

        self.tools
            .run("Repackaging", repackage(&job.output_path), ProgressKind::Repackager)
            .await?;

        info!("Produced {}", job.output_path.display());
        Ok(branch)
    }
}
