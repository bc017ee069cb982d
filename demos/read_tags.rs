//! Read a handful of tags from an image, printed both ways ExifTool can format them.
//!
//! `cargo run --example read_tags -- path/to/image.jpg`
use exiftool_process::{ExifTool, ExifToolError, Format, Tag, TagValue};
use std::path::PathBuf;

const TAGS: &[Tag] = &[
    Tag::Make,
    Tag::Model,
    Tag::ImageWidth,
    Tag::ImageHeight,
    Tag::FNumber,
    Tag::ExposureTime,
    Tag::Iso,
    Tag::DateTimeOriginal,
    Tag::GpsLatitude,
    Tag::GpsLongitude,
];

fn main() -> Result<(), ExifToolError> {
    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: read_tags <image>");
        std::process::exit(2);
    };

    let et = ExifTool::builder().stay_open(true).build()?;
    println!("ExifTool {}", et.version()?);

    // 1. As ExifTool prints them for people
    let human = et.image_meta(path.as_path(), Format::HumanReadable, TAGS)?;
    for tag in TAGS {
        match human.get(*tag) {
            Some(value) => println!("{:>18}: {}", tag, value),
            None => println!("{:>18}: <absent>", tag),
        }
    }

    // 2. Numeric, converted to typed values
    let numeric = et.image_meta(path.as_path(), Format::Numeric, TAGS)?;
    for tag in TAGS {
        if let Some(value) = numeric.value(*tag) {
            let kind = match value {
                TagValue::String(_) => "string",
                TagValue::Integer(_) => "integer",
                TagValue::Real(_) => "real",
                TagValue::Boolean(_) => "boolean",
                TagValue::DateTime(_) => "date/time",
            };
            println!("{:>18}: {:?} ({})", tag, value, kind);
        }
    }

    // 3. Everything at once, as JSON
    println!("{}", numeric.to_json());

    et.close()
}
