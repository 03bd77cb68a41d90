//! batchconv library
//!
//! Batch conversion of a video directory tree with a fixed two-pass H.264 profile,
//! per-file parameter overrides, a run log of media summaries and FTP upload of the
//! mirrored result.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{EncodingJob, FileOverride, GlobalConfig, Resolution, TrimRange, ValidatedConfig};
pub use error::{ConvertError, ConvertResult};
pub use probe::summary::MediaSummary;
