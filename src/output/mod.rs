//! Run outputs: the destination tree layout and the run log

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

pub mod run_log;

pub use run_log::{RunLog, RUN_LOG_NAME};

/// Prefix of every destination root directory
pub const DEST_ROOT_PREFIX: &str = "converted-";

/// Destination root name for a run started at `started`: `converted-%Y.%m.%d-%H%M%S`
pub fn dest_root_name(started: &DateTime<Local>) -> String {
    format!("{}{}", DEST_ROOT_PREFIX, started.format("%Y.%m.%d-%H%M%S"))
}

/// Destination root under `parent` for a run started now
pub fn dest_root_now(parent: &Path) -> PathBuf {
    parent.join(dest_root_name(&Local::now()))
}
