//! Argument and file checks run by every public entry point before a command is built.
//!
//! "Absent" is modelled as `None`. Each check hands its input back untouched on
//! success, so the checks can be chained inline:
//!
//! ```
//! use exiftool_process::preconditions::{not_blank, not_empty};
//!
//! let name = not_blank(Some("exiftool"), "Executable cannot be blank.").unwrap();
//! let tags = not_empty(Some(&[1, 2, 3][..]), "Tags cannot be empty.").unwrap();
//! assert_eq!(name, "exiftool");
//! assert_eq!(tags.len(), 3);
//! ```

use crate::error::ExifToolError;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Existence and permission probe for a file the executable will be pointed at.
///
/// Implemented for [`Path`] and [`PathBuf`] against the real file system.
pub trait FileAccess {
    fn path(&self) -> &Path;
    fn exists(&self) -> bool;
    fn can_read(&self) -> bool;
    fn can_write(&self) -> bool;
}

impl FileAccess for Path {
    fn path(&self) -> &Path {
        self
    }

    fn exists(&self) -> bool {
        Path::exists(self)
    }

    fn can_read(&self) -> bool {
        if self.is_dir() {
            fs::read_dir(self).is_ok()
        } else {
            File::open(self).is_ok()
        }
    }

    fn can_write(&self) -> bool {
        match fs::metadata(self) {
            Ok(meta) if meta.is_dir() => !meta.permissions().readonly(),
            // Opening for write without truncate or create leaves the file untouched.
            Ok(_) => OpenOptions::new().write(true).open(self).is_ok(),
            Err(_) => false,
        }
    }
}

impl FileAccess for PathBuf {
    fn path(&self) -> &Path {
        self.as_path()
    }

    fn exists(&self) -> bool {
        FileAccess::exists(self.as_path())
    }

    fn can_read(&self) -> bool {
        self.as_path().can_read()
    }

    fn can_write(&self) -> bool {
        self.as_path().can_write()
    }
}

/// Collections that [`not_empty`] can check.
pub trait Collection {
    fn is_empty_collection(&self) -> bool;
}

impl<T> Collection for [T] {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<T, const N: usize> Collection for [T; N] {
    fn is_empty_collection(&self) -> bool {
        N == 0
    }
}

impl<T> Collection for Vec<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Collection for HashMap<K, V, S> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Collection for BTreeMap<K, V> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> Collection for HashSet<T, S> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Collection for BTreeSet<T> {
    fn is_empty_collection(&self) -> bool {
        self.is_empty()
    }
}

/// Fails with [`ExifToolError::NullArgument`] when `value` is absent.
pub fn not_null<T>(value: Option<T>, message: &str) -> Result<T, ExifToolError> {
    value.ok_or_else(|| ExifToolError::NullArgument {
        message: message.to_string(),
    })
}

/// Fails when `value` is absent, empty or only whitespace.
pub fn not_blank<S: AsRef<str>>(value: Option<S>, message: &str) -> Result<S, ExifToolError> {
    let value = not_null(value, message)?;
    if value.as_ref().trim().is_empty() {
        return Err(ExifToolError::InvalidArgument {
            message: message.to_string(),
        });
    }
    Ok(value)
}

/// Fails when `value` is absent or holds no element. The same reference is returned.
pub fn not_empty<'a, C>(value: Option<&'a C>, message: &str) -> Result<&'a C, ExifToolError>
where
    C: Collection + ?Sized,
{
    let value = not_null(value, message)?;
    if value.is_empty_collection() {
        return Err(ExifToolError::InvalidArgument {
            message: message.to_string(),
        });
    }
    Ok(value)
}

/// Fails with [`ExifToolError::UnreadableFile`] when `file` does not exist or cannot be read.
pub fn is_readable<'a, F>(file: Option<&'a F>, message: &str) -> Result<&'a F, ExifToolError>
where
    F: FileAccess + ?Sized,
{
    let file = not_null(file, message)?;
    if !file.exists() || !file.can_read() {
        return Err(ExifToolError::UnreadableFile {
            path: file.path().to_path_buf(),
            message: message.to_string(),
        });
    }
    Ok(file)
}

/// Fails with [`ExifToolError::UnwritableFile`] when `file` does not exist or cannot be written.
pub fn is_writable<'a, F>(file: Option<&'a F>, message: &str) -> Result<&'a F, ExifToolError>
where
    F: FileAccess + ?Sized,
{
    let file = not_null(file, message)?;
    if !file.exists() || !file.can_write() {
        return Err(ExifToolError::UnwritableFile {
            path: file.path().to_path_buf(),
            message: message.to_string(),
        });
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeFile;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_not_null() {
        let message = "should not be null";
        let result = not_null(None::<&str>, message);
        assert_matches!(result, Err(ExifToolError::NullArgument { message: m }) if m == message);

        let val = "foo";
        let foo = not_null(Some(val), message).unwrap();
        assert_eq!(foo, val);
    }

    #[test]
    fn test_not_blank_rejects_null_empty_and_blank() {
        let message = "should not be empty";
        assert_matches!(
            not_blank(None::<&str>, message),
            Err(ExifToolError::NullArgument { .. })
        );
        assert_matches!(
            not_blank(Some(""), message),
            Err(ExifToolError::InvalidArgument { message: m }) if m == message
        );
        assert_matches!(
            not_blank(Some("  "), message),
            Err(ExifToolError::InvalidArgument { message: m }) if m == message
        );
    }

    #[test]
    fn test_not_blank_returns_value_unchanged() {
        let val = String::from("foo");
        let ptr = val.as_ptr();
        let result = not_blank(Some(val), "should not be empty").unwrap();
        assert_eq!(result, "foo");
        assert_eq!(result.as_ptr(), ptr);
    }

    #[test]
    fn test_not_empty_array() {
        let message = "should not be empty";
        assert_matches!(
            not_empty(None::<&[String]>, message),
            Err(ExifToolError::NullArgument { .. })
        );

        let empty: [String; 0] = [];
        assert_matches!(
            not_empty(Some(&empty[..]), message),
            Err(ExifToolError::InvalidArgument { message: m }) if m == message
        );

        let val = ["foo".to_string()];
        let result = not_empty(Some(&val[..]), message).unwrap();
        assert!(std::ptr::eq(result, &val[..]));
    }

    #[test]
    fn test_not_empty_map() {
        let message = "should not be empty";
        assert_matches!(
            not_empty(None::<&HashMap<String, String>>, message),
            Err(ExifToolError::NullArgument { .. })
        );

        let empty: HashMap<String, String> = HashMap::new();
        assert_matches!(
            not_empty(Some(&empty), message),
            Err(ExifToolError::InvalidArgument { .. })
        );

        let mut val = HashMap::new();
        val.insert("foo".to_string(), "bar".to_string());
        let result = not_empty(Some(&val), message).unwrap();
        assert!(std::ptr::eq(result, &val));
    }

    #[test]
    fn test_is_readable() {
        let message = "should be readable";
        assert_matches!(
            is_readable(None::<&FakeFile>, message),
            Err(ExifToolError::NullArgument { .. })
        );

        let missing = FakeFile::new("/foo.png").exists(false);
        assert_matches!(
            is_readable(Some(&missing), message),
            Err(ExifToolError::UnreadableFile { path, message: m })
                if path == Path::new("/foo.png") && m == message
        );

        let locked = FakeFile::new("/foo.png").readable(false);
        assert_matches!(
            is_readable(Some(&locked), message),
            Err(ExifToolError::UnreadableFile { .. })
        );

        let ok = FakeFile::new("/foo.png");
        let result = is_readable(Some(&ok), message).unwrap();
        assert!(std::ptr::eq(result, &ok));
    }

    #[test]
    fn test_is_writable() {
        let message = "should be writable";
        assert_matches!(
            is_writable(None::<&FakeFile>, message),
            Err(ExifToolError::NullArgument { .. })
        );

        let missing = FakeFile::new("/foo.png").exists(false);
        assert_matches!(
            is_writable(Some(&missing), message),
            Err(ExifToolError::UnwritableFile { path, .. }) if path == Path::new("/foo.png")
        );

        let locked = FakeFile::new("/foo.png").writable(false);
        assert_matches!(
            is_writable(Some(&locked), message),
            Err(ExifToolError::UnwritableFile { .. })
        );

        let ok = FakeFile::new("/foo.png");
        let result = is_writable(Some(&ok), message).unwrap();
        assert!(std::ptr::eq(result, &ok));
    }

    #[test]
    fn test_real_paths() -> Result<(), std::io::Error> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"not really an image")?;

        let path = file.path();
        assert!(is_readable(Some(path), "readable").is_ok());
        assert!(is_writable(Some(path), "writable").is_ok());
        // The probe must not truncate the file.
        assert_eq!(fs::read(path)?, b"not really an image");

        let missing = path.with_extension("does-not-exist");
        assert_matches!(
            is_readable(Some(missing.as_path()), "readable"),
            Err(ExifToolError::UnreadableFile { .. })
        );
        assert_matches!(
            is_writable(Some(&missing), "writable"),
            Err(ExifToolError::UnwritableFile { .. })
        );
        Ok(())
    }
}
