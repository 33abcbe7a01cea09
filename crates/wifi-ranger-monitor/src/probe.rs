//! Query the OS and parse the answer.

use thiserror::Error;

use wifi_ranger_core::{parse, Intent, ParseError, Platform, PlatformAdapter, Query, Reading};

use crate::runner::{CommandOutput, CommandRunner, RunnerError};

/// Errors from a single probe. All of them are per-cycle and non-fatal.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("`{command}` exited with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Pairs a platform adapter with a command runner.
pub struct Probe<R> {
    adapter: PlatformAdapter,
    runner: R,
}

impl<R: CommandRunner> Probe<R> {
    pub fn new(adapter: PlatformAdapter, runner: R) -> Self {
        Self { adapter, runner }
    }

    pub fn platform(&self) -> Platform {
        self.adapter.platform()
    }

    /// Run the command for `intent` without judging its exit status.
    pub async fn execute(&self, intent: &Intent) -> Result<CommandOutput, RunnerError> {
        let command = self.adapter.command_for(intent);
        self.runner.run(&command).await
    }

    /// Run the command for `query` and parse its output.
    ///
    /// A non-zero exit is reported as [`ProbeError::CommandFailed`] before any
    /// parsing is attempted.
    pub async fn read(&self, query: Query) -> Result<Vec<Reading>, ProbeError> {
        let command = self.adapter.command_for(&query.into());
        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(ProbeError::CommandFailed {
                command: command.to_string(),
                code: output.exit_code,
                stderr: output.stderr_text(),
            });
        }
        Ok(parse(self.platform(), &output.stdout_text(), query)?)
    }
}
