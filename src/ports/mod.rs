// Ports - Interface definitions (contracts)

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::progress::ProgressSink;
use crate::error::ConvertResult;
use crate::probe::StreamBlock;
use crate::utils::path::PathMapper;

/// One fully built external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Value following a flag, if the flag is present
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Terminal status of an external process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessExit {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Last non-empty status line observed
    pub last_line: Option<String>,
}

impl ProcessExit {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Port for spawning external tools and streaming their status text
#[async_trait]
pub trait ProcessPort: Send + Sync {
    /// Run the command to completion, handing every status line to `on_line` as it arrives
    async fn run(
        &self,
        command: &CommandSpec,
        on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> ConvertResult<ProcessExit>;
}

/// Port for media stream probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Stream blocks of a media file, in the order the probe tool reports them
    async fn probe_streams(&self, file_path: &Path) -> ConvertResult<Vec<StreamBlock>>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Every file under `dir` with the given extension, sorted
    async fn discover(&self, dir: &Path, extension: &str) -> ConvertResult<Vec<PathBuf>>;

    /// Create the destination directories that will hold at least one matching file
    async fn mirror_directories(&self, mapper: &PathMapper, extension: &str) -> ConvertResult<()>;

    /// Copy a file verbatim
    async fn copy_file(&self, from: &Path, to: &Path) -> ConvertResult<()>;

    /// Replace `to` with `from`
    async fn move_file(&self, from: &Path, to: &Path) -> ConvertResult<()>;

    /// Delete a file; a file that was never created is not an error
    async fn remove_file(&self, file_path: &Path) -> ConvertResult<()>;

    /// Size of a file in bytes
    async fn file_size(&self, file_path: &Path) -> ConvertResult<u64>;
}

/// Port for the remote file-transfer endpoint
#[async_trait]
pub trait UploadPort: Send + Sync {
    /// Store `local` on `server` at `remote_path` (segments separated by `/`), creating
    /// remote directories on the way
    async fn upload(
        &self,
        server: &str,
        local: &Path,
        remote_path: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> ConvertResult<()>;
}

/// Configuration file contents before validation
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawConfig {
    pub local_directory: Option<String>,
    pub extension: Option<String>,
    pub ftp_server: Option<String>,
    pub upload_directory: Option<String>,
    pub bitrate_ratio: Option<f64>,
    pub files: Option<Vec<RawFileOverride>>,
}

/// One `files` entry before validation
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawFileOverride {
    pub path: Option<String>,
    pub resolution: Option<String>,
    pub bitrate: Option<f64>,
    pub audio: Option<bool>,
    pub exclude: Option<bool>,
    pub cut_start: Option<f64>,
    pub cut_end: Option<f64>,
}

/// Port for configuration loading
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Load configuration from file
    async fn load_config(&self, file_path: &Path) -> ConvertResult<RawConfig>;
}
