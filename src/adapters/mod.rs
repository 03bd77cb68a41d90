// Adapters - External system implementations

pub mod config_file;
pub mod fs_local;
pub mod ftp_upload;
pub mod probe_ffprobe;
pub mod process_tokio;

// Re-export adapters
pub use config_file::ConfigFileAdapter;
pub use fs_local::LocalFsAdapter;
pub use ftp_upload::FtpUploadAdapter;
pub use probe_ffprobe::FfprobeAdapter;
pub use process_tokio::TokioProcessRunner;
