//! # exiftool-process
//!
//! Reads and writes image metadata by driving Phil Harvey's ExifTool executable.
//!
//! Each operation validates its arguments, builds an ExifTool command line, hands
//! it to an [`Executor`] and parses the `Name: value` lines that come back. Two
//! executors are provided:
//!
//! * [`SingleExecutor`] spawns one `exiftool` process per command (the default).
//! * [`StayOpenExecutor`] keeps one `exiftool -stay_open True -@ -` process alive
//!   and feeds it commands over stdin, which avoids the Perl start-up cost on
//!   every call.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use exiftool_process::{ExifTool, ExifToolError, Format, Tag};
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! fn main() -> Result<(), ExifToolError> {
//!     let exiftool = ExifTool::builder()
//!         .stay_open(true)
//!         .overwrite_original(true)
//!         .build()?;
//!     let image = Path::new("path/to/your/image.jpg");
//!
//!     let meta = exiftool.image_meta(image, Format::Numeric, &[Tag::ImageWidth, Tag::Iso][..])?;
//!     for (tag, value) in meta.iter() {
//!         println!("{}: {}", tag, value);
//!     }
//!
//!     let mut values = HashMap::new();
//!     values.insert(Tag::UserComment, "This is a test comment");
//!     exiftool.set_image_meta(image, &values)?;
//!
//!     // The stay-open process is shut down on close, or when `exiftool` is dropped.
//!     exiftool.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Typed values
//!
//! ```no_run
//! use exiftool_process::{ExifTool, ExifToolError, Format, Tag};
//! use serde::Deserialize;
//! use std::path::Path;
//!
//! #[derive(Deserialize, Debug)]
//! #[serde(rename_all = "PascalCase")]
//! struct Dimensions {
//!     image_width: u32,
//!     image_height: u32,
//! }
//!
//! fn main() -> Result<(), ExifToolError> {
//!     let exiftool = ExifTool::new()?;
//!     let meta = exiftool.image_meta(
//!         Path::new("path/to/your/image.jpg"),
//!         Format::Numeric,
//!         &[Tag::ImageWidth, Tag::ImageHeight][..],
//!     )?;
//!     let dimensions: Dimensions = meta.deserialize()?;
//!     println!("{:?}", dimensions);
//!     Ok(())
//! }
//! ```

mod command;
mod error;
mod exiftool;
pub mod executors;
mod format;
mod metadata;
pub mod parser;
pub mod preconditions;
mod tag;
mod version;

#[cfg(test)]
mod test_utils;

pub use command::Command;
pub use error::ExifToolError;
pub use executors::{ExecutionResult, Executor, SingleExecutor, StayOpenExecutor};
pub use exiftool::{ExifTool, ExifToolBuilder, EXIFTOOL_PATH_ENV};
pub use format::Format;
pub use metadata::ImageMeta;
pub use tag::{ExifDateTime, Tag, TagKind, TagValue};
pub use version::Version;
