// Domain models - Core types and data structures

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Create a resolution, rejecting zero-sized frames
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Parse a `WxH` string such as `1920x1080`
    pub fn parse(text: &str) -> Option<Self> {
        let (width, height) = text.trim().split_once('x')?;
        if width.is_empty()
            || height.is_empty()
            || !width.bytes().all(|b| b.is_ascii_digit())
            || !height.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        Self::new(width.parse().ok()?, height.parse().ok()?)
    }

    /// Pixel area of one frame
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cut range in seconds, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// Create a trim range; a zero-length range is allowed
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
            return None;
        }
        Some(Self { start, end })
    }
}

/// Target bitrate and its ceiling, both in megabits per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rates {
    pub maxrate: f64,
    pub bitrate: f64,
}

/// Global settings shared by every file of a run
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    pub source_dir: PathBuf,
    pub extension: String,
    pub bitrate_ratio: f64,
    pub upload_dir: String,
    pub ftp_server: String,
}

/// Per-file settings taking precedence over the globals
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileOverride {
    pub path: PathBuf,
    pub resolution: Option<Resolution>,
    pub bitrate: Option<f64>,
    pub audio: Option<bool>,
    pub exclude: Option<bool>,
    pub trim: Option<TrimRange>,
}

impl FileOverride {
    /// True when at least one setting besides the path is present
    pub fn has_settings(&self) -> bool {
        self.resolution.is_some()
            || self.bitrate.is_some()
            || self.audio.is_some()
            || self.exclude.is_some()
            || self.trim.is_some()
    }
}

/// Configuration that passed validation: globals plus overrides keyed by full source path
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub global: GlobalConfig,
    pub overrides: HashMap<PathBuf, FileOverride>,
}

impl ValidatedConfig {
    pub fn override_for(&self, source: &Path) -> Option<&FileOverride> {
        self.overrides.get(source)
    }
}

/// Which external invocation sequence a job takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeBranch {
    /// Verbatim copy, no encoder
    Excluded,
    /// Single pass with audio disabled
    NoAudio,
    /// Analysis pass followed by the real encode
    TwoPass,
}

/// Fully resolved parameters for one input file
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingJob {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub resolution: Resolution,
    pub bitrate: f64,
    pub maxrate: f64,
    pub has_audio: bool,
    pub excluded: bool,
    pub trim: Option<TrimRange>,
}

impl EncodingJob {
    /// Branch the orchestrator takes for this job
    pub fn branch(&self) -> EncodeBranch {
        if self.excluded {
            EncodeBranch::Excluded
        } else if self.has_audio {
            EncodeBranch::TwoPass
        } else {
            EncodeBranch::NoAudio
        }
    }
}

/// One progress observation parsed from a tool's status output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressEvent {
    Encoding {
        elapsed_seconds: f64,
        total_seconds: f64,
        percent: u8,
    },
    Repackaging {
        current_unit: u64,
        total_units: u64,
        percent: u8,
    },
    Transfer {
        bytes_sent: u64,
        total_bytes: u64,
        percent: u8,
    },
}

impl ProgressEvent {
    pub fn percent(&self) -> u8 {
        match self {
            ProgressEvent::Encoding { percent, .. }
            | ProgressEvent::Repackaging { percent, .. }
            | ProgressEvent::Transfer { percent, .. } => *percent,
        }
    }
}
