//! FTP upload adapter
//!
//! Anonymous FTP with binary transfers. The blocking client runs on tokio's blocking pool,
//! one transfer at a time.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info};

use crate::domain::model::ProgressEvent;
use crate::engine::progress::ProgressSink;
use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;
use crate::utils::Utils;

/// Bytes handed to the transport per read
pub const BLOCK_SIZE: usize = 1024;

const DEFAULT_PORT: u16 = 21;
const ANONYMOUS: &str = "anonymous";

/// `host:port`, defaulting to port 21
pub fn server_address(server: &str) -> String {
    let server = server.trim();
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, DEFAULT_PORT)
    }
}

/// Splits `a/b/file.mp4` into its directory segments and file name
pub fn split_remote_path(remote_path: &str) -> (Vec<&str>, Option<&str>) {
    let mut segments: Vec<&str> = remote_path.split('/').filter(|s| !s.is_empty()).collect();
    let file_name = segments.pop();
    (segments, file_name)
}

/// Reader that reports transferred bytes as [`ProgressEvent::Transfer`]
pub struct ProgressReader<R> {
    inner: R,
    bytes_sent: u64,
    total_bytes: u64,
    last_percent: Option<u8>,
    sink: Arc<dyn ProgressSink>,
}

impl<R: Read> ProgressReader<R> {
    pub fn new(inner: R, total_bytes: u64, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            inner,
            bytes_sent: 0,
            total_bytes,
            last_percent: None,
            sink,
        }
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let limit = buf.len().min(BLOCK_SIZE);
        let read = self.inner.read(&mut buf[..limit])?;
        self.bytes_sent += read as u64;

        if let Some(percent) = Utils::percent_of(self.bytes_sent, self.total_bytes) {
            if self.last_percent != Some(percent) {
                self.last_percent = Some(percent);
                self.sink.on_progress(&ProgressEvent::Transfer {
                    bytes_sent: self.bytes_sent,
                    total_bytes: self.total_bytes,
                    percent,
                });
            }
        }
        Ok(read)
    }
}

/// FTP implementation of [`UploadPort`]
pub struct FtpUploadAdapter;

impl FtpUploadAdapter {
    pub fn new() -> Self {
        Self
    }

    fn transfer(
        address: &str,
        local: &Path,
        remote_path: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<u64, String> {
        let (dirs, file_name) = split_remote_path(remote_path);
        let file_name = file_name.ok_or_else(|| "empty remote path".to_string())?;

        let file = File::open(local).map_err(|e| e.to_string())?;
        let total_bytes = file.metadata().map_err(|e| e.to_string())?.len();

        let mut ftp = FtpStream::connect(address).map_err(|e| e.to_string())?;
        ftp.login(ANONYMOUS, ANONYMOUS).map_err(|e| e.to_string())?;
        ftp.transfer_type(FileType::Binary).map_err(|e| e.to_string())?;

        for dir in dirs {
            Self::enter_dir(&mut ftp, dir).map_err(|e| format!("{}: {}", dir, e))?;
        }

        let mut reader = ProgressReader::new(file, total_bytes, sink);
        let stored = ftp.put_file(file_name, &mut reader).map_err(|e| e.to_string())?;
        // file is stored at this point
        let _ = ftp.quit();
        Ok(stored)
    }

    /// Change into `dir`, creating it first when it does not exist
    fn enter_dir(ftp: &mut FtpStream, dir: &str) -> Result<(), FtpError> {
        if ftp.cwd(dir).is_ok() {
            return Ok(());
        }
        ftp.mkdir(dir)?;
        ftp.cwd(dir)
    }
}

impl Default for FtpUploadAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UploadPort for FtpUploadAdapter {
    async fn upload(
        &self,
        server: &str,
        local: &Path,
        remote_path: &str,
        sink: Arc<dyn ProgressSink>,
    ) -> ConvertResult<()> {
        let address = server_address(server);
        info!("Uploading '{}' to {}/{}", local.display(), address, remote_path);

        let local_owned: PathBuf = local.to_path_buf();
        let remote = remote_path.to_string();
        let task_sink = Arc::clone(&sink);

        sink.on_start(&format!("Uploading {}", file_label(local)));
        let result = tokio::task::spawn_blocking(move || {
            Self::transfer(&address, &local_owned, &remote, task_sink)
        })
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r);
        sink.on_finish(result.is_ok());

        let stored = result.map_err(|message| ConvertError::UploadFailure {
            path: local.display().to_string(),
            message,
        })?;
        debug!("{} byte(s) stored at {}", stored, remote_path);
        Ok(())
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressSink for RecordingSink {
        fn on_start(&self, _operation: &str) {}
        fn on_progress(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(*event);
        }
        fn on_finish(&self, _success: bool) {}
    }

    fn drain<R: Read>(reader: &mut R) -> usize {
        let mut buf = [0u8; 4096];
        let mut total = 0;
        loop {
            let read = reader.read(&mut buf).unwrap();
            if read == 0 {
                return total;
            }
            total += read;
        }
    }

    #[test]
    fn test_server_address() {
        assert_eq!(server_address("ftp.example.com"), "ftp.example.com:21");
        assert_eq!(server_address("10.0.0.5:2121"), "10.0.0.5:2121");
    }

    #[test]
    fn test_split_remote_path() {
        assert_eq!(
            split_remote_path("incoming/videos/s1/e1.mp4"),
            (vec!["incoming", "videos", "s1"], Some("e1.mp4"))
        );
        assert_eq!(split_remote_path("/conversion.log"), (vec![], Some("conversion.log")));
        assert_eq!(split_remote_path(""), (vec![], None));
    }

    #[test]
    fn test_progress_reader_reports_in_blocks() {
        let sink = Arc::new(RecordingSink::default());
        let data = vec![7u8; 4 * BLOCK_SIZE];
        let mut reader = ProgressReader::new(Cursor::new(data), (4 * BLOCK_SIZE) as u64, sink.clone());

        assert_eq!(drain(&mut reader), 4 * BLOCK_SIZE);
        assert_eq!(reader.bytes_sent(), (4 * BLOCK_SIZE) as u64);
        let percents: Vec<u8> = sink.events.lock().unwrap().iter().map(|e| e.percent()).collect();
        assert_eq!(percents, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_progress_reader_empty_file() {
        let sink = Arc::new(RecordingSink::default());
        let mut reader = ProgressReader::new(Cursor::new(Vec::new()), 0, sink.clone());
        assert_eq!(drain(&mut reader), 0);
        assert!(sink.events.lock().unwrap().is_empty());
    }
}
