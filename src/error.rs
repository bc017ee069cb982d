use std::path::PathBuf;
use thiserror::Error;

/// Every failure the wrapper can report.
///
/// The set is closed: callers are expected to `match` on it. Argument and
/// resource variants are pre-flight contract violations raised before any
/// process is touched; `Execution` is the only one worth retrying.
#[derive(Debug, Error)]
pub enum ExifToolError {
    /// A required argument was absent.
    #[error("{message}")]
    NullArgument { message: String },

    /// An argument was present but blank, empty or otherwise unusable.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// The target file does not exist or cannot be read.
    #[error("{message}")]
    UnreadableFile { path: PathBuf, message: String },

    /// The target file does not exist or cannot be written.
    #[error("{message}")]
    UnwritableFile { path: PathBuf, message: String },

    /// The executable could not be started, died mid-response, or reported failure.
    #[error("ExifTool execution failed: {message}. command={command_args}")]
    Execution {
        message: String,
        command_args: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The executor was closed and does not accept commands anymore.
    #[error("ExifTool executor has been closed.")]
    Closed,

    #[error("Deserialization error at path '{path}': {source}")]
    Deserialization {
        path: String,
        source: serde_json::Error,
    },
}

impl ExifToolError {
    pub(crate) fn execution(message: impl Into<String>, command_args: impl Into<String>) -> Self {
        ExifToolError::Execution {
            message: message.into(),
            command_args: command_args.into(),
            source: None,
        }
    }

    pub(crate) fn io(
        message: impl Into<String>,
        command_args: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        ExifToolError::Execution {
            message: message.into(),
            command_args: command_args.into(),
            source: Some(source),
        }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ExifToolError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        ExifToolError::Deserialization {
            path: err.path().to_string(),
            source: err.into_inner(),
        }
    }
}
