// Application layer - Use case interactors

use std::sync::Arc;

use crate::engine::progress::ProgressSink;
use crate::ports::{ConfigPort, FsPort, ProbePort, ProcessPort, UploadPort};

pub mod container;
pub mod convert_interactor;
pub mod inspect_interactor;
pub mod upload_interactor;
pub mod validate_interactor;

// Re-export interactors
pub use convert_interactor::{ConvertInteractor, ConvertReport, ConvertRequest, RunContext};
pub use inspect_interactor::InspectInteractor;
pub use upload_interactor::UploadInteractor;
pub use validate_interactor::ValidateInteractor;

/// Port implementations the interactors are built from
#[derive(Clone)]
pub struct AppPorts {
    pub config: Arc<dyn ConfigPort>,
    pub probe: Arc<dyn ProbePort>,
    pub fs: Arc<dyn FsPort>,
    pub process: Arc<dyn ProcessPort>,
    pub upload: Arc<dyn UploadPort>,
    pub progress: Arc<dyn ProgressSink>,
}
