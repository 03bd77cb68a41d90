// Convert interactor - the whole batch run

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::app::upload_interactor::UploadInteractor;
use crate::app::validate_interactor::ValidateInteractor;
use crate::app::AppPorts;
use crate::domain::model::*;
use crate::engine::orchestrator::EncodeOrchestrator;
use crate::engine::resolver::JobResolver;
use crate::engine::ToolRunner;
use crate::error::{ConvertError, ConvertResult};
use crate::output::{dest_root_now, RunLog};
use crate::ports::*;
use crate::probe::summary::{MediaSummary, MetadataSummarizer};
use crate::utils::path::PathMapper;

/// Convert request parameters
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub config_path: PathBuf,
    /// Directory the `converted-<timestamp>` root is created in
    pub output_root: PathBuf,
    pub upload: bool,
}

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub dest_root: PathBuf,
    pub run_log: PathBuf,
    pub summaries: Vec<MediaSummary>,
    pub uploaded: usize,
}

/// Per-run state handed to the per-file pipeline
pub struct RunContext {
    pub config: ValidatedConfig,
    pub mapper: PathMapper,
    pub log: RunLog,
}

/// Interactor for the batch conversion use case
pub struct ConvertInteractor {
    validator: Arc<ValidateInteractor>,
    fs_port: Arc<dyn FsPort>,
    resolver: JobResolver,
    orchestrator: EncodeOrchestrator,
    summarizer: MetadataSummarizer,
    uploader: UploadInteractor,
}

impl ConvertInteractor {
    pub fn new(ports: &AppPorts, validator: Arc<ValidateInteractor>) -> Self {
        let tools = ToolRunner::new(Arc::clone(&ports.process), Arc::clone(&ports.progress));
        Self {
            validator,
            fs_port: Arc::clone(&ports.fs),
            resolver: JobResolver::new(Arc::clone(&ports.probe)),
            orchestrator: EncodeOrchestrator::new(tools, Arc::clone(&ports.fs)),
            summarizer: MetadataSummarizer::new(Arc::clone(&ports.probe), Arc::clone(&ports.fs)),
            uploader: UploadInteractor::new(
                Arc::clone(&ports.fs),
                Arc::clone(&ports.upload),
                Arc::clone(&ports.progress),
            ),
        }
    }

    pub async fn execute(&self, request: ConvertRequest) -> ConvertResult<ConvertReport> {
        let config = self.validator.execute(&request.config_path).await?;
        self.run(config, &request.output_root, request.upload).await
    }

    /// Convert every matching file of an already validated configuration
    pub async fn run(
        &self,
        config: ValidatedConfig,
        output_root: &Path,
        upload: bool,
    ) -> ConvertResult<ConvertReport> {
        let global = &config.global;
        let files = self
            .fs_port
            .discover(&global.source_dir, &global.extension)
            .await?;
        if files.is_empty() {
            return Err(ConvertError::NoInputFiles {
                directory: global.source_dir.display().to_string(),
                extension: global.extension.clone(),
            });
        }

        let mapper = PathMapper::new(&global.source_dir, dest_root_now(output_root));
        self.fs_port
            .mirror_directories(&mapper, &global.extension)
            .await?;
        let log = RunLog::create(mapper.dest_root())?;
        let mut ctx = RunContext { config, mapper, log };

        info!("Starting file processing: {} file(s)", files.len());
        let mut summaries = Vec::with_capacity(files.len());
        for (index, source) in files.iter().enumerate() {
            let summary = match self.process_file(&ctx, source).await {
                Ok(summary) => summary,
                Err(e) => {
                    error!("Conversion of '{}' failed: {}", source.display(), e);
                    return Err(e);
                }
            };
            ctx.log.record(index + 1, &summary)?;
            summaries.push(summary);
        }

        let RunContext { config, mapper, log } = ctx;
        let run_log = log.close()?;
        info!("Converted! Local storage: {}", mapper.dest_root().display());

        let uploaded = if upload {
            self.uploader.execute(&config.global, &mapper, &run_log).await?
        } else {
            info!("Upload skipped");
            0
        };

        Ok(ConvertReport {
            dest_root: mapper.dest_root().to_path_buf(),
            run_log,
            summaries,
            uploaded,
        })
    }

    /// Resolve, encode, then summarize the original input
    async fn process_file(&self, ctx: &RunContext, source: &Path) -> ConvertResult<MediaSummary> {
        info!("Processing '{}'", source.display());
        let job = self
            .resolver
            .resolve(
                &ctx.config.global,
                &ctx.mapper,
                source,
                ctx.config.override_for(source),
            )
            .await?;

        let branch = self.orchestrator.execute(&job).await?;
        info!("'{}' done ({:?})", source.display(), branch);

        self.summarizer.summarize(source).await
    }
}
