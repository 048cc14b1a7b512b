//! Storage backend trait and implementations.
//!
//! A backend is the target side of the organizer: the catalog decides which
//! file goes where, and the backend puts it there. Sources are always plain
//! files on the local filesystem (the scanned corpus); targets are paths
//! relative to the backend's root.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use crate::models::{FileInfo, Transfer};
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for storage backends.
///
/// # Path Handling
/// Every `path` argument is relative to the storage root and must pass
/// [`validate_path`](crate::validate_path); implementations enforce this.
/// The `source` argument of [`place()`](Self::place) is an absolute path on
/// the local filesystem.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use gutcat_storage::{StorageBackend, Transfer, error::Result};
///
/// async fn shelve(backend: &dyn StorageBackend) -> Result<u64> {
///     let target = Path::new("italian/txt/1000.txt");
///     if !backend.exists(target).await? {
///         backend.place(Path::new("/corpus/1/0/0/1000/1000.txt"), target, Transfer::Copy).await?;
///     }
///     Ok(backend.stat(target).await?.size)
/// }
/// ```
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend (used for logging only).
    fn name(&self) -> &str;

    /// Check if a file exists.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get file metadata without reading contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    async fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Write file contents, creating parent directories as needed and
    /// overwriting any existing file.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Copy or move a local file into storage.
    ///
    /// Parent directories are created as needed and an existing file at
    /// `path` is replaced. Returns [`NotFound`](crate::error::ErrorKind::NotFound)
    /// if `source` does not exist.
    async fn place(&self, source: &Path, path: &Path, transfer: Transfer) -> Result<()>;
}
