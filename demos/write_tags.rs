//! Write a comment and a rating to a copy of an image, then read them back.
//!
//! `cargo run --example write_tags -- path/to/image.jpg`
use exiftool_process::{ExifTool, Format, Tag};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(source) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: write_tags <image>");
        std::process::exit(2);
    };

    // Work on a temporary copy so the original stays untouched.
    let temp_dir = tempfile::tempdir()?;
    let file_name = source.file_name().ok_or("source has no file name")?;
    let temp_path = temp_dir.path().join(file_name);
    fs::copy(&source, &temp_path)?;
    println!("Working with temporary file: {}", temp_path.display());

    // -overwrite_original prevents the FILE_original backup
    let et = ExifTool::builder().overwrite_original(true).build()?;

    let mut values: HashMap<Tag, String> = HashMap::new();
    values.insert(Tag::UserComment, "Hello from exiftool-process!".to_string());
    values.insert(Tag::Rating, 5u8.to_string());
    et.set_image_meta(temp_path.as_path(), &values)?;

    let meta = et.image_meta(
        temp_path.as_path(),
        Format::Numeric,
        &[Tag::UserComment, Tag::Rating][..],
    )?;
    println!("Read back comment: {:?}", meta.get(Tag::UserComment));
    println!("Read back rating: {:?}", meta.get(Tag::Rating));
    assert_eq!(meta.get(Tag::UserComment), Some("Hello from exiftool-process!"));
    assert_eq!(meta.get(Tag::Rating), Some("5"));

    Ok(())
}
