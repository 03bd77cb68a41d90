//! Error handling module for batchconv

use thiserror::Error;

/// Main error type for batchconv operations
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Configuration failed validation; every problem found is listed
    #[error("Invalid configuration:\n{}", problems.iter().map(|p| format!("  - {p}")).collect::<Vec<_>>().join("\n"))]
    ConfigInvalid { problems: Vec<String> },

    /// Resolution could not be used to derive encoding parameters
    #[error("Wrong resolution: '{resolution}' for {path}")]
    InvalidResolution { path: String, resolution: String },

    /// Probe tool produced no usable fields
    #[error("Failed to probe media file {path}: {message}")]
    ProbeFailure { path: String, message: String },

    /// External encoder or repackager exited with a non-zero status
    #[error("{tool} exited with status {}: {last_line}", exit_code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    EncodeFailure {
        tool: String,
        exit_code: Option<i32>,
        last_line: String,
    },

    /// Filesystem copy, mkdir or log write failed
    #[error("I/O failure on {path}: {source}")]
    IoFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Nothing matched the extension filter
    #[error("There are no files with the appropriate extension ({extension}) in {directory}")]
    NoInputFiles { directory: String, extension: String },

    /// Upload transport error
    #[error("Upload of {path} failed: {message}")]
    UploadFailure { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        ConvertError::IoFailure {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Build a single-problem configuration error
    pub fn config(problem: impl Into<String>) -> Self {
        ConvertError::ConfigInvalid {
            problems: vec![problem.into()],
        }
    }
}

/// Result type alias for batchconv operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
