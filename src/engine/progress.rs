//! Progress parsing of external tool status output, and progress display sinks

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use crate::domain::model::ProgressEvent;
use crate::utils::time::TimeParser;

/// Which status grammar a process speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    /// `Duration: H:MM:SS.ss` header, then `time=HH:MM:SS.ss` status lines
    Encoder,
    /// `<label> (<current>/<total>)` status lines
    Repackager,
}

/// Encoder status grammar. No event is produced until the duration line has been seen.
pub struct EncoderProgressParser {
    duration_re: Regex,
    time_re: Regex,
    total_seconds: Option<f64>,
}

impl EncoderProgressParser {
    pub fn new() -> Self {
        Self {
            duration_re: Regex::new(r"Duration:\s*(?P<clock>\d+:\d{2}:\d{2}(?:\.\d+)?)")
                .expect("duration pattern is valid"),
            time_re: Regex::new(r"time=\s*(?P<clock>\d+:\d{2}:\d{2}(?:\.\d+)?)")
                .expect("time pattern is valid"),
            total_seconds: None,
        }
    }

    /// Total duration once known
    pub fn total_seconds(&self) -> Option<f64> {
        self.total_seconds
    }

    pub fn feed(&mut self, line: &str) -> Option<ProgressEvent> {
        if self.total_seconds.is_none() {
            if let Some(caps) = self.duration_re.captures(line) {
                self.total_seconds = TimeParser::parse_clock(&caps["clock"]);
            }
        }

        let caps = self.time_re.captures(line)?;
        let elapsed_seconds = TimeParser::parse_clock(&caps["clock"])?;
        let total_seconds = self.total_seconds.filter(|total| *total > 0.0)?;

        let percent = (elapsed_seconds / total_seconds * 100.0).round().clamp(0.0, 100.0) as u8;
        Some(ProgressEvent::Encoding {
            elapsed_seconds,
            total_seconds,
            percent,
        })
    }
}

impl Default for EncoderProgressParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Repackager status grammar
pub struct RepackagerProgressParser {
    step_re: Regex,
}

impl RepackagerProgressParser {
    pub fn new() -> Self {
        Self {
            step_re: Regex::new(r"^(?P<label>\S.*?)\s*\((?P<current>\d+)/(?P<total>\d+)\)")
                .expect("step pattern is valid"),
        }
    }

    pub fn feed(&self, line: &str) -> Option<ProgressEvent> {
        let caps = self.step_re.captures(line.trim_start())?;
        let current_unit: u64 = caps["current"].parse().ok()?;
        let total_units: u64 = caps["total"].parse().ok()?;
        if total_units == 0 {
            return None;
        }

        let raw = (current_unit as f64 * 100.0 / total_units as f64).ceil();
        // the wrapped tool reports its last step as 99
        let percent = if raw == 99.0 { 100.0 } else { raw.min(100.0) };
        Some(ProgressEvent::Repackaging {
            current_unit,
            total_units,
            percent: percent as u8,
        })
    }
}

impl Default for RepackagerProgressParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Line parser selected by [`ProgressKind`]
pub enum ProgressParser {
    Encoder(EncoderProgressParser),
    Repackager(RepackagerProgressParser),
}

impl ProgressParser {
    pub fn for_kind(kind: ProgressKind) -> Self {
        match kind {
            ProgressKind::Encoder => ProgressParser::Encoder(EncoderProgressParser::new()),
            ProgressKind::Repackager => ProgressParser::Repackager(RepackagerProgressParser::new()),
        }
    }

    /// Feed one status line; returns an event when the line carries emittable progress
    pub fn feed(&mut self, line: &str) -> Option<ProgressEvent> {
        match self {
            ProgressParser::Encoder(parser) => parser.feed(line),
            ProgressParser::Repackager(parser) => parser.feed(line),
        }
    }
}

/// Progress display port
pub trait ProgressSink: Send + Sync {
    /// Called when an external operation starts
    fn on_start(&self, operation: &str);

    /// Called for every parsed progress event
    fn on_progress(&self, event: &ProgressEvent);

    /// Called when the operation ends
    fn on_finish(&self, success: bool);
}

/// Console progress bar for interactive runs
pub struct ConsoleProgressSink {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgressSink {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<28} [{bar:50.cyan/blue}] {pos:>3}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ")
    }
}

impl Default for ConsoleProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn on_start(&self, operation: &str) {
        let bar = ProgressBar::new(100);
        bar.set_style(Self::style());
        bar.set_message(operation.to_string());
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(bar) {
                previous.abandon();
            }
        }
    }

    fn on_progress(&self, event: &ProgressEvent) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(event.percent() as u64);
            }
        }
    }

    fn on_finish(&self, success: bool) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                if success {
                    bar.set_position(100);
                    bar.finish();
                } else {
                    bar.abandon();
                }
            }
        }
    }
}

/// JSON progress events on stdout, one object per line
pub struct JsonProgressSink;

impl ProgressSink for JsonProgressSink {
    fn on_start(&self, operation: &str) {
        let event = serde_json::json!({
            "event": "start",
            "operation": operation,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!("{}", event);
    }

    fn on_progress(&self, event: &ProgressEvent) {
        let event = serde_json::json!({
            "event": "progress",
            "percent": event.percent(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!("{}", event);
    }

    fn on_finish(&self, success: bool) {
        let event = serde_json::json!({
            "event": if success { "complete" } else { "error" },
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!("{}", event);
    }
}

/// No-op progress sink for when progress display is disabled
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {
    fn on_start(&self, _operation: &str) {}
    fn on_progress(&self, _event: &ProgressEvent) {}
    fn on_finish(&self, _success: bool) {}
}
