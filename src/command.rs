use crate::error::ExifToolError;
use crate::format::Format;
use crate::tag::Tag;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Request for the version string, printed on its own line.
const VERSION_FLAG: &str = "-ver";
/// Very short output: one `TagName: value` line per tag, no group headers.
const SHORT_OUTPUT_FLAG: &str = "-S";

/// One invocation of the executable: where it lives and the arguments to pass.
///
/// Built fresh for each call and never modified afterwards. The same command can
/// be run as a separate process or fed to a stay-open process, which reads one
/// argument per line, so no argument may contain a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    executable: PathBuf,
    args: Vec<String>,
}

impl Command {
    /// `exiftool -ver`
    pub fn version(executable: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            args: vec![VERSION_FLAG.to_string()],
        }
    }

    /// `exiftool [-n] -S -TAG... FILE`
    ///
    /// Tags are de-duplicated, keeping the first occurrence. ExifTool is free to
    /// print them in another order.
    pub fn read(
        executable: &Path,
        file: &Path,
        format: Format,
        tags: &[Tag],
    ) -> Result<Self, ExifToolError> {
        let mut args = Vec::with_capacity(tags.len() + 3);
        if let Some(flag) = format.flag() {
            args.push(flag.to_string());
        }
        args.push(SHORT_OUTPUT_FLAG.to_string());

        let mut seen = Vec::with_capacity(tags.len());
        for tag in tags {
            if !seen.contains(tag) {
                seen.push(*tag);
                args.push(format!("-{}", tag.name()));
            }
        }
        args.push(file_arg(file));

        Self::checked(executable, args)
    }

    /// `exiftool -TAG=VALUE... [extra_args...] FILE`
    ///
    /// A tag given twice keeps its last value. Arguments are emitted in registry order.
    pub fn write<I>(
        executable: &Path,
        file: &Path,
        values: I,
        extra_args: &[&str],
    ) -> Result<Self, ExifToolError>
    where
        I: IntoIterator<Item = (Tag, String)>,
    {
        let values: BTreeMap<Tag, String> = values.into_iter().collect();
        let mut args: Vec<String> = values
            .iter()
            .map(|(tag, value)| format!("-{}={}", tag.name(), value))
            .collect();
        args.extend(extra_args.iter().map(|a| a.to_string()));
        args.push(file_arg(file));

        Self::checked(executable, args)
    }

    fn checked(executable: &Path, args: Vec<String>) -> Result<Self, ExifToolError> {
        if let Some(arg) = args.iter().find(|a| a.contains(['\n', '\r'])) {
            return Err(ExifToolError::InvalidArgument {
                message: format!("Argument cannot contain line breaks: {:?}", arg),
            });
        }
        Ok(Self {
            executable: executable.to_path_buf(),
            args,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments joined by spaces, for logs and error reports.
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }

    /// Request text for a stay-open process: one argument per line, terminated by
    /// `-execute<token>` so stdout ends with `{ready<token>}`. `-echo4` makes
    /// ExifTool print the same marker on stderr once the command has been processed.
    pub(crate) fn stay_open_request(&self, token: u64) -> String {
        let mut request = String::new();
        for arg in &self.args {
            request.push_str(arg);
            request.push('\n');
        }
        request.push_str(&format!("-echo4\n{}\n", ready_marker(token)));
        request.push_str(&format!("-execute{}\n", token));
        request
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.executable.display(), self.command_line())
    }
}

/// The end-of-response line ExifTool prints for `-execute<token>`.
pub(crate) fn ready_marker(token: u64) -> String {
    format!("{{ready{}}}", token)
}

// A relative path starting with '-' would be taken for an option.
fn file_arg(file: &Path) -> String {
    let path = file.to_string_lossy();
    if path.starts_with('-') {
        format!("./{}", path)
    } else {
        path.into_owned()
    }
}
