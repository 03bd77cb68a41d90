// Upload interactor - pushes the produced tree and the run log to the remote endpoint

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::model::GlobalConfig;
use crate::engine::progress::ProgressSink;
use crate::error::ConvertResult;
use crate::ports::*;
use crate::utils::path::PathMapper;

/// Uploads every produced file with the configured extension, mirrored under the upload
/// directory, then the run log into the upload directory itself
pub struct UploadInteractor {
    fs_port: Arc<dyn FsPort>,
    upload_port: Arc<dyn UploadPort>,
    progress: Arc<dyn ProgressSink>,
}

impl UploadInteractor {
    pub fn new(
        fs_port: Arc<dyn FsPort>,
        upload_port: Arc<dyn UploadPort>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            fs_port,
            upload_port,
            progress,
        }
    }

    /// Returns the number of transfers made, run log included
    pub async fn execute(
        &self,
        global: &GlobalConfig,
        mapper: &PathMapper,
        run_log: &Path,
    ) -> ConvertResult<usize> {
        let files = self
            .fs_port
            .discover(mapper.dest_root(), &global.extension)
            .await?;
        if files.is_empty() {
            warn!("Nothing to upload");
            return Ok(0);
        }

        info!("Starting file upload");
        for (index, file) in files.iter().enumerate() {
            info!("{}) Uploading '{}'", index + 1, file.display());
            let remote = mapper.remote_path(file, &global.upload_dir);
            self.upload_port
                .upload(&global.ftp_server, file, &remote, Arc::clone(&self.progress))
                .await?;
        }

        info!("{}) Uploading '{}'", files.len() + 1, run_log.display());
        let log_name = run_log.file_name().map(Path::new).unwrap_or(run_log);
        let remote = mapper.remote_path(&mapper.dest_root().join(log_name), &global.upload_dir);
        self.upload_port
            .upload(&global.ftp_server, run_log, &remote, Arc::clone(&self.progress))
            .await?;

        info!(
            "All files were uploaded to {}/{}",
            global.ftp_server, global.upload_dir
        );
        Ok(files.len() + 1)
    }
}
