use std::sync::Arc;

use crate::adapters::{
    ConfigFileAdapter, FfprobeAdapter, FtpUploadAdapter, LocalFsAdapter, TokioProcessRunner,
};
use crate::app::{AppPorts, ConvertInteractor, InspectInteractor, ValidateInteractor};
use crate::engine::progress::{
    ConsoleProgressSink, JsonProgressSink, ProgressSink,
};

/// How external-tool and upload progress is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// indicatif bars
    Console,
    /// JSON lines on stdout
    Json,
}

pub trait AppContainer: Send + Sync {
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn validate_interactor(&self) -> Arc<ValidateInteractor>;
}

pub struct DefaultAppContainer {
    convert_interactor: Arc<ConvertInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    validate_interactor: Arc<ValidateInteractor>,
}

impl DefaultAppContainer {
    /// Wire the real adapters
    pub fn new(progress_mode: ProgressMode) -> Self {
        let progress: Arc<dyn ProgressSink> = match progress_mode {
            ProgressMode::Console => Arc::new(ConsoleProgressSink::new()),
            ProgressMode::Json => Arc::new(JsonProgressSink),
        };

        Self::with_ports(AppPorts {
            config: Arc::new(ConfigFileAdapter::new()),
            probe: Arc::new(FfprobeAdapter::new()),
            fs: Arc::new(LocalFsAdapter::new()),
            process: Arc::new(TokioProcessRunner::new()),
            upload: Arc::new(FtpUploadAdapter::new()),
            progress,
        })
    }

    /// Wire interactors over any set of ports
    pub fn with_ports(ports: AppPorts) -> Self {
        let validate_interactor = Arc::new(ValidateInteractor::new(
            Arc::clone(&ports.config),
            Arc::clone(&ports.probe),
        ));

        let convert_interactor = Arc::new(ConvertInteractor::new(
            &ports,
            Arc::clone(&validate_interactor),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&ports.probe),
            Arc::clone(&ports.fs),
        ));

        Self {
            convert_interactor,
            inspect_interactor,
            validate_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn validate_interactor(&self) -> Arc<ValidateInteractor> {
        Arc::clone(&self.validate_interactor)
    }
}
