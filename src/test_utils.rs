//! Test doubles shared by the unit tests.

use crate::command::Command;
use crate::error::ExifToolError;
use crate::executors::{ExecutionResult, Executor};
use crate::preconditions::FileAccess;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Stand-in for ExifTool speaking both the one-shot and the stay-open protocol.
///
/// * `-ver` prints `12.40`.
/// * `-TAG` prints `TAG: <value>`, the last value written to `FILE.fake` or `fake TAG`.
/// * `-TAG=VALUE` appends to `FILE.fake` and prints `1 image files updated`.
/// * A target containing `missing` reports a file-not-found error on stderr,
///   `warn` adds a warning, `crash` makes the process exit mid-request and `hang`
///   blocks a stay-open request until the process is killed, `stale` prints a
///   `{ready}` marker for another request and `corrupt` reports a warning then an error.
/// * In stay-open mode the `-echo4` text is printed on stderr after each request.
#[cfg(unix)]
const FAKE_EXIFTOOL: &str = r#"#!/bin/sh
respond() {
  target=""
  for target in "$@"; do :; done
  case "$target" in
    *crash*) exit 3 ;;
    *stale*) echo "{ready999}" ;;
    *corrupt*)
      echo "Warning: bad maker notes in $target" >&2
      echo "Error: corrupt file - $target" >&2
      return 1 ;;
    *missing*) echo "Error: File not found - $target" >&2; return 1 ;;
    *warn*) echo "Warning: fake warning for $target" >&2 ;;
    *hang*) read -r never_sent ;;
  esac
  updated=0
  for arg in "$@"; do
    case "$arg" in
      -ver) echo "12.40"; return 0 ;;
      -S|-n|-overwrite_original) ;;
      -*=*)
        kv="${arg#-}"
        printf '%s: %s\n' "${kv%%=*}" "${kv#*=}" >> "$target.fake"
        updated=1 ;;
      -*)
        name="${arg#-}"
        if [ -f "$target.fake" ] && grep -q "^$name: " "$target.fake"; then
          grep "^$name: " "$target.fake" | tail -n 1
        else
          echo "$name: fake $name"
        fi ;;
    esac
  done
  if [ "$updated" = 1 ]; then echo "    1 image files updated"; fi
  return 0
}

if [ "$1" = "-stay_open" ]; then
  set --
  echo_next=0
  echo_text=""
  while IFS= read -r line; do
    if [ "$echo_next" = 1 ]; then
      echo_text="$line"
      echo_next=0
      continue
    fi
    case "$line" in
      -echo4) echo_next=1 ;;
      -execute*)
        token="${line#-execute}"
        if [ "$1" = "-stay_open" ] && [ "$2" = "False" ]; then exit 0; fi
        respond "$@"
        echo "{ready$token}"
        if [ -n "$echo_text" ]; then echo "$echo_text" >&2; fi
        echo_text=""
        set -- ;;
      *) set -- "$@" "$line" ;;
    esac
  done
  exit 0
fi

respond "$@" || exit 1
"#;

#[cfg(unix)]
static FAKE_EXIFTOOL_PATH: once_cell::sync::Lazy<(tempfile::TempDir, PathBuf)> =
    once_cell::sync::Lazy::new(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("exiftool");
        std::fs::write(&path, FAKE_EXIFTOOL).expect("write fake exiftool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("make fake exiftool executable");
        (dir, path)
    });

/// Path of the fake executable. Created once, before the first test spawns it.
#[cfg(unix)]
pub fn fake_exiftool() -> &'static Path {
    FAKE_EXIFTOOL_PATH.1.as_path()
}

/// File whose existence and permissions are whatever the test says.
#[derive(Debug, Clone)]
pub struct FakeFile {
    path: PathBuf,
    exists: bool,
    readable: bool,
    writable: bool,
}

impl FakeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            readable: true,
            writable: true,
        }
    }

    pub fn exists(mut self, exists: bool) -> Self {
        self.exists = exists;
        self
    }

    pub fn readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }
}

impl FileAccess for FakeFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.exists
    }

    fn can_read(&self) -> bool {
        self.readable
    }

    fn can_write(&self) -> bool {
        self.writable
    }
}

type Responder = dyn Fn(&Command) -> Result<ExecutionResult, ExifToolError> + Send + Sync;

/// Executor that records every command and answers from a closure.
pub struct SpyExecutor {
    log: SpyLog,
    closed: AtomicBool,
    respond: Box<Responder>,
}

/// Handle onto the commands a [`SpyExecutor`] has received.
#[derive(Debug, Clone, Default)]
pub struct SpyLog(Arc<Mutex<Vec<Command>>>);

impl SpyLog {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Command> {
        self.0.lock().unwrap().last().cloned()
    }
}

impl SpyExecutor {
    pub fn new<F>(respond: F) -> (Self, SpyLog)
    where
        F: Fn(&Command) -> Result<ExecutionResult, ExifToolError> + Send + Sync + 'static,
    {
        let log = SpyLog::default();
        let spy = Self {
            log: log.clone(),
            closed: AtomicBool::new(false),
            respond: Box::new(respond),
        };
        (spy, log)
    }

    /// Answers `-ver` with `version` and everything else with `output`.
    pub fn with_output(version: &'static str, output: &'static str) -> (Self, SpyLog) {
        Self::new(move |cmd| {
            if cmd.args().iter().any(|a| a == "-ver") {
                Ok(ExecutionResult::success(format!("{}\n", version)))
            } else {
                Ok(ExecutionResult::success(output))
            }
        })
    }
}

impl Executor for SpyExecutor {
    fn execute(&self, command: &Command) -> Result<ExecutionResult, ExifToolError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExifToolError::Closed);
        }
        self.log.0.lock().unwrap().push(command.clone());
        (self.respond)(command)
    }

    fn close(&self) -> Result<(), ExifToolError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
