//! Turns ExifTool's text output into values.

use crate::error::ExifToolError;
use crate::executors::ExecutionResult;
use crate::metadata::ImageMeta;
use crate::tag::Tag;
use crate::version::Version;
use std::collections::HashMap;

/// Separator between a tag name and its value in `-S` / `-s` output.
const DELIMITER: char = ':';

/// Reads the output of `exiftool -ver`.
pub fn parse_version(result: &ExecutionResult) -> Result<Version, ExifToolError> {
    ensure_success(result, "-ver")?;
    let raw = result.output().trim();
    if raw.is_empty() {
        return Err(ExifToolError::execution("empty version output", "-ver"));
    }
    Ok(Version::new(raw))
}

/// Builds the tag map from `Name: Value` lines.
///
/// Lines without a delimiter, unknown names and tags that were not asked for are
/// skipped. Tags missing from the output are simply absent from the map.
pub fn parse_tags(result: &ExecutionResult, requested: &[Tag]) -> Result<ImageMeta, ExifToolError> {
    ensure_success(result, "")?;

    let mut values = HashMap::with_capacity(requested.len());
    for line in result.output().lines() {
        let Some((name, value)) = split_line(line) else {
            log::trace!("Skipping unrecognised line: {}", line);
            continue;
        };
        match Tag::from_name(name) {
            Some(tag) if requested.contains(&tag) => {
                values.insert(tag, value.to_string());
            }
            _ => log::trace!("Skipping tag not requested: {}", name),
        }
    }

    Ok(ImageMeta::new(values))
}

// "Make: Canon" and the padded "Make              : Canon" both give ("Make", "Canon").
fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches('\r');
    let (name, value) = line.split_once(DELIMITER)?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, value.strip_prefix(' ').unwrap_or(value)))
}

fn ensure_success(result: &ExecutionResult, command_args: &str) -> Result<(), ExifToolError> {
    if result.is_success() {
        Ok(())
    } else {
        Err(ExifToolError::execution(result.failure_message(), command_args))
    }
}
