//! Encoding engine: command building, parameter resolution and the per-file pipeline

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{ConvertError, ConvertResult};
use crate::ports::{CommandSpec, ProcessPort};

pub mod commands;
pub mod orchestrator;
pub mod progress;
pub mod resolver;
pub mod trim;

use progress::{ProgressKind, ProgressParser, ProgressSink};

/// Runs one external tool, feeding its status lines through a progress parser into the sink.
#[derive(Clone)]
pub struct ToolRunner {
    runner: Arc<dyn ProcessPort>,
    sink: Arc<dyn ProgressSink>,
}

impl ToolRunner {
    pub fn new(runner: Arc<dyn ProcessPort>, sink: Arc<dyn ProgressSink>) -> Self {
        Self { runner, sink }
    }

    /// Run `command` to completion. A non-zero exit is an [`ConvertError::EncodeFailure`]
    /// carrying the tool's last status line.
    pub async fn run(&self, label: &str, command: CommandSpec, kind: ProgressKind) -> ConvertResult<()> {
        debug!("Executing: {}", command);
        self.sink.on_start(label);

        let mut parser = ProgressParser::for_kind(kind);
        let sink = Arc::clone(&self.sink);
        let mut on_line = move |line: &str| {
            if let Some(event) = parser.feed(line) {
                sink.on_progress(&event);
            }
        };

        let exit = match self.runner.run(&command, &mut on_line).await {
            Ok(exit) => exit,
            Err(e) => {
                self.sink.on_finish(false);
                return Err(e);
            }
        };
        self.sink.on_finish(exit.success());

        if exit.success() {
            return Ok(());
        }

        let last_line = exit.last_line.unwrap_or_default();
        error!("{} failed: {}", command.program, last_line);
        Err(ConvertError::EncodeFailure {
            tool: command.program,
            exit_code: exit.exit_code,
            last_line,
        })
    }
}
