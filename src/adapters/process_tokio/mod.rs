// Process adapter - spawns external tools and streams their status output

use std::io;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::error::{ConvertError, ConvertResult};
use crate::ports::*;

/// Splits a byte stream into status segments at `\r` or `\n`, dropping empty segments
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk, returning the segments it completed
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut segments = Vec::new();
        for &byte in bytes {
            if byte == b'\r' || byte == b'\n' {
                if let Some(segment) = self.take() {
                    segments.push(segment);
                }
            } else {
                self.pending.push(byte);
            }
        }
        segments
    }

    /// Trailing segment left without a separator
    pub fn finish(mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let segment = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(segment)
    }
}

async fn pump<R>(mut reader: R, tx: mpsc::UnboundedSender<String>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut splitter = LineSplitter::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        for segment in splitter.push(&chunk[..read]) {
            // receiver only goes away once the run is over
            let _ = tx.send(segment);
        }
    }
    if let Some(segment) = splitter.finish() {
        let _ = tx.send(segment);
    }
    Ok(())
}

/// Await every reader task, keeping the first failure
async fn join_readers(readers: Vec<JoinHandle<io::Result<()>>>) -> io::Result<()> {
    let mut outcome = Ok(());
    for reader in readers {
        let result = reader
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
            .and_then(|result| result);
        if outcome.is_ok() {
            outcome = result;
        }
    }
    outcome
}

/// Reap the child. A failed drain kills it first so it never outlives the run.
async fn settle(child: &mut Child, drained: io::Result<()>) -> io::Result<ExitStatus> {
    if let Err(e) = drained {
        let _ = child.kill().await;
        return Err(e);
    }
    child.wait().await
}

/// Process runner built on `tokio::process`.
///
/// stdout and stderr are each drained by their own task into one channel; the calling task
/// hands every segment to the line callback until both pipes close, then awaits the exit status.
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessPort for TokioProcessRunner {
    async fn run(
        &self,
        command: &CommandSpec,
        on_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> ConvertResult<ProcessExit> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ConvertError::io(&command.program, e))?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(pump(stdout, tx.clone())));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(pump(stderr, tx.clone())));
        }
        drop(tx);

        let mut last_line = None;
        while let Some(segment) = rx.recv().await {
            trace!("{}: {}", command.program, segment);
            let trimmed = segment.trim();
            if !trimmed.is_empty() {
                last_line = Some(trimmed.to_string());
            }
            on_line(&segment);
        }

        let drained = join_readers(readers).await;
        let status = settle(&mut child, drained)
            .await
            .map_err(|e| ConvertError::io(&command.program, e))?;

        Ok(ProcessExit {
            exit_code: status.code(),
            last_line,
        })
    }
}
