use crate::command::Command;
use crate::error::ExifToolError;
use crate::executors::{classify_stderr, ExecutionResult, Executor};
use std::sync::atomic::{AtomicBool, Ordering};

/// Spawns a fresh `exiftool` process for every command and waits for it to exit.
///
/// Holds no process state, so concurrent calls simply run side by side.
#[derive(Debug, Default)]
pub struct SingleExecutor {
    closed: AtomicBool,
}

impl SingleExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for SingleExecutor {
    fn execute(&self, command: &Command) -> Result<ExecutionResult, ExifToolError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(ExifToolError::Closed);
        }
        log::debug!("Running {}", command);

        let output = std::process::Command::new(command.executable())
            .args(command.args())
            .output()
            .map_err(|e| {
                ExifToolError::io(
                    format!("failed to start {}", command.executable().display()),
                    command.command_line(),
                    e,
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let stderr_lines: Vec<String> = stderr.lines().map(String::from).collect();
        let reported_error = classify_stderr(&stderr_lines);

        // Killed by a signal: no exit code.
        let mut exit_status = output.status.code().unwrap_or(-1);
        if exit_status == 0 && reported_error {
            exit_status = 1;
        }

        Ok(ExecutionResult::new(stdout, stderr, exit_status))
    }

    fn close(&self) -> Result<(), ExifToolError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
