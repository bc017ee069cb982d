use crate::command::{ready_marker, Command};
use crate::error::ExifToolError;
use crate::executors::{classify_stderr, ExecutionResult, Executor};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Stdio};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread;

/// Runs every command through one long-lived `exiftool -stay_open True -@ -` process.
///
/// The process is started lazily by the first command, using that command's
/// executable. Commands are serialized by an internal lock: one request/response
/// cycle at a time. Each request ends with `-execute<N>` where `N` is unique to the
/// call, and its response is read up to the matching `{ready<N>}` line.
///
/// If the process dies or the pipes break mid-response, the call fails and the
/// process is discarded; the next command starts a new one. [`close`](Executor::close)
/// is final. It kills the process first, so a command blocked on a response
/// fails with [`ExifToolError::Execution`] instead of holding up the close.
#[derive(Debug, Default)]
pub struct StayOpenExecutor {
    state: Mutex<State>,
    // The running child, reachable without the state lock.
    child: Mutex<Option<SharedChild>>,
    closed: AtomicBool,
    next_token: AtomicU64,
}

type SharedChild = Arc<Mutex<Child>>;

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Running(Session),
    Closed,
}

impl StayOpenExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| {
            // A panic mid-request leaves the pipes in an unknown position.
            let mut state = poisoned.into_inner();
            if let State::Running(_) = *state {
                log::warn!("Discarding ExifTool process after a panic during a request");
                *state = State::Idle;
            }
            self.state.clear_poison();
            state
        })
    }
}

impl Executor for StayOpenExecutor {
    fn execute(&self, command: &Command) -> Result<ExecutionResult, ExifToolError> {
        let mut state = self.lock();

        if self.closed.load(Ordering::Acquire) {
            *state = State::Closed;
        }
        let needs_start = match &*state {
            State::Closed => return Err(ExifToolError::Closed),
            State::Idle => true,
            State::Running(session) => session.executable != command.executable(),
        };
        if needs_start {
            // Replacing a running session drops it, which shuts it down.
            let session = Session::start(command.executable())?;
            let mut child = self.child.lock().unwrap_or_else(PoisonError::into_inner);
            *child = Some(Arc::clone(&session.child));
            drop(child);
            // close() may have emptied the slot just before it was filled.
            if self.closed.load(Ordering::Acquire) {
                *state = State::Closed;
                return Err(ExifToolError::Closed);
            }
            *state = State::Running(session);
        }
        let State::Running(session) = &mut *state else {
            unreachable!("session was started above");
        };

        let token = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        match session.send(command, token) {
            Ok(result) => Ok(result),
            Err(e) if self.closed.load(Ordering::Acquire) => {
                *state = State::Closed;
                Err(e)
            }
            Err(e) => {
                log::warn!("Discarding ExifTool process after failed request: {}", e);
                *state = State::Idle;
                Err(e)
            }
        }
    }

    fn close(&self) -> Result<(), ExifToolError> {
        self.closed.store(true, Ordering::Release);
        // Unblocks a request waiting on the response, which then releases the state lock.
        let child = self.child.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(child) = child {
            let _ = child.lock().unwrap_or_else(PoisonError::into_inner).kill();
        }

        let previous = std::mem::replace(&mut *self.lock(), State::Closed);
        if let State::Running(mut session) = previous {
            session.shutdown()?;
        }
        Ok(())
    }

    // Never waits on a request in flight: a held lock means a process is serving it.
    fn is_running(&self) -> bool {
        match self.state.try_lock() {
            Ok(state) => matches!(*state, State::Running(_)),
            Err(TryLockError::WouldBlock) => !self.closed.load(Ordering::Acquire),
            // Discarded by the next lock.
            Err(TryLockError::Poisoned(_)) => false,
        }
    }
}

/// One live `exiftool -stay_open` process and its pipes.
#[derive(Debug)]
struct Session {
    executable: PathBuf,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr_receiver: Receiver<String>,
    child: SharedChild,
}

impl Session {
    fn start(executable: &Path) -> Result<Self, ExifToolError> {
        let start_args = "-stay_open True -@ -";
        log::debug!("Starting {} {}", executable.display(), start_args);

        let mut child = std::process::Command::new(executable)
            .arg("-stay_open")
            .arg("True")
            .arg("-@")
            .arg("-") // Read command args from stdin
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExifToolError::io(
                    format!("failed to start {}", executable.display()),
                    start_args,
                    e,
                )
            })?;

        let missing = |stream: &str| {
            ExifToolError::execution(format!("failed to capture {}", stream), start_args)
        };
        let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing("stderr"))?;

        // Stderr is pumped by a thread so a chatty process can never block on it.
        let (stderr_sender, stderr_receiver) = mpsc::channel();
        let stderr_reader = BufReader::new(stderr);
        thread::spawn(move || {
            for line in stderr_reader.lines().map_while(Result::ok) {
                if stderr_sender.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            executable: executable.to_path_buf(),
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout),
            stderr_receiver,
            child: Arc::new(Mutex::new(child)),
        })
    }

    fn send(&mut self, command: &Command, token: u64) -> Result<ExecutionResult, ExifToolError> {
        log::debug!("Executing {} (token {})", command.command_line(), token);
        let broken_pipe = |e| ExifToolError::io("failed to send request", command.command_line(), e);
        self.stdin
            .write_all(command.stay_open_request(token).as_bytes())
            .map_err(broken_pipe)?;
        self.stdin.flush().map_err(broken_pipe)?;

        let output = self.read_until_ready(command, token)?;
        let stderr_lines = self.read_stderr_until_ready(command, token)?;
        let exit_status = if classify_stderr(&stderr_lines) { 1 } else { 0 };

        Ok(ExecutionResult::new(output, stderr_lines.join("\n"), exit_status))
    }

    /// Reads stdout line by line until `{ready<token>}`.
    fn read_until_ready(&mut self, command: &Command, token: u64) -> Result<String, ExifToolError> {
        let marker = ready_marker(token);
        let mut output = String::new();
        let mut line = Vec::with_capacity(256);

        loop {
            line.clear();
            let bytes_read = self
                .stdout
                .read_until(b'\n', &mut line)
                .map_err(|e| ExifToolError::io("failed to read response", command.command_line(), e))?;

            if bytes_read == 0 {
                let stderr_lines: Vec<String> = self.stderr_receiver.try_iter().collect();
                let message = if stderr_lines.is_empty() {
                    "process terminated unexpectedly".to_string()
                } else {
                    format!("process terminated unexpectedly: {}", stderr_lines.join("\n"))
                };
                return Err(ExifToolError::execution(message, command.command_line()));
            }

            let text = String::from_utf8_lossy(&line);
            let trimmed = text.trim_end_matches(['\r', '\n']);
            if trimmed == marker {
                return Ok(output);
            }
            if trimmed.starts_with("{ready") && trimmed.ends_with('}') {
                return Err(ExifToolError::execution(
                    format!("expected {} but received {}", marker, trimmed),
                    command.command_line(),
                ));
            }
            log::trace!("exiftool> {}", trimmed);
            output.push_str(trimmed);
            output.push('\n');
        }
    }

    /// Collects the stderr lines of this request, up to the `-echo4` marker.
    fn read_stderr_until_ready(
        &mut self,
        command: &Command,
        token: u64,
    ) -> Result<Vec<String>, ExifToolError> {
        let marker = ready_marker(token);
        let mut err_lines = Vec::new();

        loop {
            match self.stderr_receiver.recv() {
                Ok(line) if line.trim_end() == marker => return Ok(err_lines),
                Ok(line) => err_lines.push(line),
                Err(_) => {
                    return Err(ExifToolError::execution(
                        format!("stderr closed before {}: {}", marker, err_lines.join("\n")),
                        command.command_line(),
                    ))
                }
            }
        }
    }

    /// Asks the process to leave stay-open mode, then makes sure it is gone.
    fn shutdown(&mut self) -> Result<(), ExifToolError> {
        let mut child = self.child.lock().unwrap_or_else(PoisonError::into_inner);
        if let Ok(Some(_)) = child.try_wait() {
            return Ok(());
        }
        log::debug!("Stopping {}", self.executable.display());
        let request = "-stay_open\nFalse\n-execute\n";
        let sent = self
            .stdin
            .write_all(request.as_bytes())
            .and_then(|_| self.stdin.flush());
        let _ = child.kill();
        let _ = child.wait();
        sent.map_err(|e| ExifToolError::io("failed to stop process", "-stay_open False", e))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
