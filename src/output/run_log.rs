//! Append-only run log writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};
use crate::probe::summary::MediaSummary;

/// File name of the run log inside the destination root
pub const RUN_LOG_NAME: &str = "conversion.log";

/// One line per processed file, `<ordinal>) <summary>`. Lines are flushed as they are
/// written so an interrupted run keeps every completed entry.
pub struct RunLog {
    path: PathBuf,
    writer: BufWriter<File>,
    entries: usize,
}

impl RunLog {
    /// Create (truncate) the log at `<dest_root>/conversion.log`
    pub fn create(dest_root: &Path) -> ConvertResult<Self> {
        let path = dest_root.join(RUN_LOG_NAME);
        let file = File::create(&path).map_err(|e| ConvertError::io(&path, e))?;
        debug!("Run log opened at {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            entries: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines written so far
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn record(&mut self, ordinal: usize, summary: &MediaSummary) -> ConvertResult<()> {
        writeln!(self.writer, "{}", Self::format_line(ordinal, summary))
            .and_then(|_| self.writer.flush())
            .map_err(|e| ConvertError::io(&self.path, e))?;
        self.entries += 1;
        Ok(())
    }

    pub fn format_line(ordinal: usize, summary: &MediaSummary) -> String {
        format!("{}) {}", ordinal, summary)
    }

    /// Flush and close the log, returning its path
    pub fn close(mut self) -> ConvertResult<PathBuf> {
        self.writer
            .flush()
            .map_err(|e| ConvertError::io(&self.path, e))?;
        Ok(self.path)
    }
}
