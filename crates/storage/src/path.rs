//! Path validation for storage-relative paths.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates and normalizes a path relative to a storage root.
///
/// Rendered target paths come from templates fed with index titles and
/// language tags, so anything that resolves outside the root (`..` past the
/// top, a Windows prefix) or contains a null byte is rejected with
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath). `.` components,
/// repeated separators and leading or trailing slashes are dropped.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gutcat_storage::validate_path;
/// assert!(validate_path("en/txt/1000.txt").is_ok());
/// assert!(validate_path("en/../fr/txt/1000.txt").is_ok());
/// assert!(validate_path("../1000.txt").is_err());
/// assert!(validate_path("en/../../1000.txt").is_err());
/// assert_eq!(
///     validate_path("/italian//./epub/pg1000.epub/").unwrap(),
///     Path::new("italian/epub/pg1000.epub")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(segment) => {
                if segment.as_encoded_bytes().contains(&0) {
                    exn::bail!(invalid());
                }
                components.push(segment);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(invalid()),
        false => Ok(components.into_iter().collect()),
    }
}
