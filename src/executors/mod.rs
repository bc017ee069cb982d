//! Strategies for running a [`Command`](crate::Command).
//!
//! [`SingleExecutor`] spawns one process per command. [`StayOpenExecutor`] keeps
//! one `exiftool -stay_open True` process alive and serializes commands through it.

mod single;
mod stay_open;

pub use single::SingleExecutor;
pub use stay_open::StayOpenExecutor;

use crate::command::Command;
use crate::error::ExifToolError;

/// Outcome of one command: what was printed and whether ExifTool was happy with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    output: String,
    error_output: String,
    exit_status: i32,
}

impl ExecutionResult {
    pub fn new(output: impl Into<String>, error_output: impl Into<String>, exit_status: i32) -> Self {
        Self {
            output: output.into(),
            error_output: error_output.into(),
            exit_status,
        }
    }

    /// Successful result with the given stdout and nothing on stderr.
    pub fn success(output: impl Into<String>) -> Self {
        Self::new(output, "", 0)
    }

    /// Text printed on stdout.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Text printed on stderr.
    pub fn error_output(&self) -> &str {
        &self.error_output
    }

    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    pub fn is_success(&self) -> bool {
        self.exit_status == 0
    }

    /// Why the command failed, in the most useful form available.
    pub(crate) fn failure_message(&self) -> String {
        let stderr = self.error_output.trim();
        if stderr.is_empty() {
            format!("exiftool exited with status {}", self.exit_status)
        } else {
            stderr.to_string()
        }
    }
}

/// Runs commands against the executable.
///
/// Implementations own whatever process state they need and are responsible for
/// serializing access to it; callers may share one executor across threads.
pub trait Executor: Send + Sync {
    fn execute(&self, command: &Command) -> Result<ExecutionResult, ExifToolError>;

    /// Releases the executor. Every later [`execute`](Executor::execute) fails with
    /// [`ExifToolError::Closed`]. Closing twice is not an error.
    fn close(&self) -> Result<(), ExifToolError>;

    /// Whether a long-lived process is currently alive.
    fn is_running(&self) -> bool {
        false
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, command: &Command) -> Result<ExecutionResult, ExifToolError> {
        (**self).execute(command)
    }

    fn close(&self) -> Result<(), ExifToolError> {
        (**self).close()
    }

    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

/// Splits stderr into warnings worth logging and errors that fail the command.
pub(crate) fn classify_stderr(lines: &[String]) -> bool {
    let mut failed = false;
    for line in lines {
        if line.contains("Error:") {
            failed = true;
        } else if line.contains("Warning:") {
            log::warn!("ExifTool {}", line);
        }
    }
    failed
}
