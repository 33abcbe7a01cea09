//! External command execution.
//!
//! The runner is the only piece that touches the OS. It knows nothing about
//! WiFi: it takes a [`CommandLine`], waits for the process, and hands back
//! raw bytes plus the exit status.

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use wifi_ranger_core::CommandLine;

/// Raw result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout decoded as UTF-8, invalid sequences replaced.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// stderr decoded as UTF-8 and trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Errors that prevent a command from producing output at all.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

/// Executes command lines.
///
/// Implemented by [`SystemRunner`] for real processes and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunnerError>;
}

/// Runs commands as child processes, each bounded by a timeout.
///
/// A command that outlives the timeout is killed.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandLine) -> Result<CommandOutput, RunnerError> {
        debug!("Running `{}`", command);

        let mut child = tokio::process::Command::new(&command.program);
        child
            .args(&command.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, child.output()).await {
            Ok(Ok(output)) => Ok(CommandOutput {
                stdout: output.stdout,
                stderr: output.stderr,
                exit_code: output.status.code(),
            }),
            Ok(Err(source)) => Err(RunnerError::Spawn {
                command: command.to_string(),
                source,
            }),
            Err(_) => Err(RunnerError::TimedOut {
                command: command.to_string(),
                timeout: self.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_helpers() {
        let output = CommandOutput {
            stdout: b"SSID: Cafe\n".to_vec(),
            stderr: b"  warning \n".to_vec(),
            exit_code: Some(0),
        };
        assert!(output.success());
        assert_eq!(output.stdout_text(), "SSID: Cafe\n");
        assert_eq!(output.stderr_text(), "warning");

        let killed = CommandOutput {
            exit_code: None,
            ..Default::default()
        };
        assert!(!killed.success());
    }

    #[test]
    fn test_lossy_decoding() {
        let output = CommandOutput {
            stdout: vec![b'S', 0xFF, b'D'],
            ..Default::default()
        };
        assert_eq!(output.stdout_text(), "S\u{FFFD}D");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = SystemRunner::new(Duration::from_secs(5));
        let command = CommandLine::new("wifi-ranger-no-such-program", ["--help"]);

        let err = runner.run(&command).await.unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
        assert!(err.to_string().contains("wifi-ranger-no-such-program"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_reported() {
        let runner = SystemRunner::new(Duration::from_secs(5));
        let output = runner
            .run(&CommandLine::new("sh", ["-c", "echo hello; exit 3"]))
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout_text(), "hello\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_command_times_out() {
        let runner = SystemRunner::new(Duration::from_millis(100));
        let err = runner
            .run(&CommandLine::new("sleep", ["5"]))
            .await
            .unwrap_err();

        assert!(matches!(err, RunnerError::TimedOut { .. }));
    }
}
