use crate::command::Command;
use crate::error::ExifToolError;
use crate::executors::{Executor, SingleExecutor, StayOpenExecutor};
use crate::format::Format;
use crate::metadata::ImageMeta;
use crate::parser::{parse_tags, parse_version};
use crate::preconditions::{is_readable, is_writable, not_blank, not_empty, not_null, FileAccess};
use crate::tag::Tag;
use crate::version::Version;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable consulted for the executable when none is configured.
pub const EXIFTOOL_PATH_ENV: &str = "EXIFTOOL_PATH";
const DEFAULT_EXECUTABLE: &str = "exiftool";

const IMAGE_NULL: &str = "Image cannot be null and must be a valid stream of image data.";
const FORMAT_NULL: &str = "Format cannot be null.";
const TAGS_EMPTY: &str = "Tags cannot be null and must contain 1 or more Tag to query the image for.";
const VALUES_EMPTY: &str =
    "Tag values cannot be null and must contain 1 or more Tag to write to the image.";

/// Reads and writes metadata by driving the `exiftool` executable.
///
/// Every operation validates its arguments first, so a bad call never reaches
/// the executable. The executable's version is probed once, on first use, and
/// cached for the life of the instance.
///
/// By default each command spawns its own process. With
/// [`stay_open`](ExifToolBuilder::stay_open) a single long-lived process serves
/// all commands, which is much faster for many small reads.
///
/// `close` is final: afterwards every operation that needs the executable fails
/// with [`ExifToolError::Closed`]. Dropping the instance closes it.
///
/// ```no_run
/// use exiftool_process::{ExifTool, ExifToolError, Format, Tag};
/// use std::path::Path;
///
/// fn main() -> Result<(), ExifToolError> {
///     let exiftool = ExifTool::builder().stay_open(true).build()?;
///     println!("ExifTool {}", exiftool.version()?);
///
///     let meta = exiftool.image_meta(
///         Path::new("data/image.jpg"),
///         Format::HumanReadable,
///         &[Tag::Make, Tag::Model][..],
///     )?;
///     if let Some(make) = meta.get(Tag::Make) {
///         println!("Make: {}", make);
///     }
///     Ok(())
/// }
/// ```
pub struct ExifTool {
    executable: PathBuf,
    executor: Box<dyn Executor>,
    overwrite_original: bool,
    version: OnceCell<Version>,
}

impl ExifTool {
    /// One-shot instance using `$EXIFTOOL_PATH` or `exiftool` from `PATH`.
    ///
    /// No process is started until the first operation.
    pub fn new() -> Result<Self, ExifToolError> {
        Self::builder().build()
    }

    pub fn builder() -> ExifToolBuilder {
        ExifToolBuilder::default()
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Version of the executable, probed with `-ver` on the first call only.
    pub fn version(&self) -> Result<&Version, ExifToolError> {
        self.version.get_or_try_init(|| {
            let command = Command::version(&self.executable);
            let result = self.executor.execute(&command)?;
            let version = parse_version(&result)?;
            log::debug!("Using ExifTool {} at {}", version, self.executable.display());
            Ok(version)
        })
    }

    /// Reads `tags` from `file`.
    ///
    /// Runs `exiftool [-n] -S -TAG... FILE`. Tags the file doesn't carry are left
    /// out of the result. Accepts a path or `None`, so callers holding optional
    /// values get [`ExifToolError::NullArgument`] instead of having to unwrap.
    pub fn image_meta<'a, F, P, M, T>(
        &self,
        file: P,
        format: M,
        tags: T,
    ) -> Result<ImageMeta, ExifToolError>
    where
        F: FileAccess + ?Sized + 'a,
        P: Into<Option<&'a F>>,
        M: Into<Option<Format>>,
        T: Into<Option<&'a [Tag]>>,
    {
        let file = not_null(file.into(), IMAGE_NULL)?;
        let format = not_null(format.into(), FORMAT_NULL)?;
        let tags = not_empty(tags.into(), TAGS_EMPTY)?;
        let file = is_readable(Some(file), &unreadable_message(file.path()))?;

        self.version()?;

        let command = Command::read(&self.executable, file.path(), format, tags)?;
        let result = self.executor.execute(&command)?;
        parse_tags(&result, tags)
    }

    /// Writes each `(tag, value)` pair to `file`.
    ///
    /// Runs `exiftool -TAG=VALUE... [-overwrite_original] FILE`. Values are written
    /// with their `ToString` form.
    pub fn set_image_meta<'a, F, P, V, M>(&self, file: P, values: M) -> Result<(), ExifToolError>
    where
        F: FileAccess + ?Sized + 'a,
        P: Into<Option<&'a F>>,
        V: ToString + 'a,
        M: Into<Option<&'a HashMap<Tag, V>>>,
    {
        let file = not_null(file.into(), IMAGE_NULL)?;
        let values = not_empty(values.into(), VALUES_EMPTY)?;
        let file = is_writable(Some(file), &unwritable_message(file.path()))?;

        self.version()?;

        let extra_args: &[&str] = if self.overwrite_original {
            &["-overwrite_original"]
        } else {
            &[]
        };
        let command = Command::write(
            &self.executable,
            file.path(),
            values.iter().map(|(tag, value)| (*tag, value.to_string())),
            extra_args,
        )?;
        let result = self.executor.execute(&command)?;
        if !result.is_success() {
            return Err(ExifToolError::execution(
                result.failure_message(),
                command.command_line(),
            ));
        }
        Ok(())
    }

    /// Whether a stay-open process is currently alive.
    pub fn is_running(&self) -> bool {
        self.executor.is_running()
    }

    /// Stops any stay-open process. Later operations fail with [`ExifToolError::Closed`].
    pub fn close(&self) -> Result<(), ExifToolError> {
        self.executor.close()
    }
}

impl Drop for ExifTool {
    fn drop(&mut self) {
        let _ = self.executor.close();
    }
}

impl fmt::Debug for ExifTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExifTool")
            .field("executable", &self.executable)
            .field("overwrite_original", &self.overwrite_original)
            .field("version", &self.version.get())
            .finish_non_exhaustive()
    }
}

fn unreadable_message(path: &Path) -> String {
    format!(
        "Unable to read the given image [{}], ensure that the image exists at the given path \
         and that the executing process has permissions to read it.",
        path.display()
    )
}

fn unwritable_message(path: &Path) -> String {
    format!(
        "Unable to write the given image [{}], ensure that the image exists at the given path \
         and that the executing process has permissions to write to it.",
        path.display()
    )
}

/// Configures an [`ExifTool`]. Building never starts a process.
#[derive(Default)]
pub struct ExifToolBuilder {
    executable: Option<PathBuf>,
    stay_open: bool,
    overwrite_original: bool,
    executor: Option<Box<dyn Executor>>,
}

impl ExifToolBuilder {
    /// Path to the executable. Defaults to `$EXIFTOOL_PATH`, then `exiftool`.
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Keep one `exiftool -stay_open` process for all commands.
    pub fn stay_open(mut self, enabled: bool) -> Self {
        self.stay_open = enabled;
        self
    }

    /// Pass `-overwrite_original` on writes so no `FILE_original` backup is left behind.
    pub fn overwrite_original(mut self, enabled: bool) -> Self {
        self.overwrite_original = enabled;
        self
    }

    /// Use a custom execution strategy. Takes precedence over [`stay_open`](Self::stay_open).
    pub fn executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Some(Box::new(executor));
        self
    }

    pub fn build(self) -> Result<ExifTool, ExifToolError> {
        let executable = self.executable.unwrap_or_else(|| {
            std::env::var_os(EXIFTOOL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE))
        });
        not_blank(
            Some(executable.to_string_lossy()),
            "ExifTool executable path cannot be blank.",
        )?;

        let executor = match self.executor {
            Some(executor) => executor,
            None if self.stay_open => Box::new(StayOpenExecutor::new()),
            None => Box::new(SingleExecutor::new()),
        };

        Ok(ExifTool {
            executable,
            executor,
            overwrite_original: self.overwrite_original,
            version: OnceCell::new(),
        })
    }
}

impl fmt::Debug for ExifToolBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExifToolBuilder")
            .field("executable", &self.executable)
            .field("stay_open", &self.stay_open)
            .field("overwrite_original", &self.overwrite_original)
            .field("custom_executor", &self.executor.is_some())
            .finish()
    }
}
