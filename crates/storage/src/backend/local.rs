//! Local filesystem storage backend.
//!
//! Files are stored under a configured root directory and accessed through
//! `tokio::fs`.

use crate::error::{ErrorKind, Result};
use crate::models::{FileInfo, Transfer};
use crate::path::validate as validate_path;
use crate::StorageBackend;
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::io::{Error as IoError, ErrorKind as IoErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use gutcat_storage::backend::LocalBackend;
///
/// # fn example() -> gutcat_storage::error::Result<()> {
/// let backend = LocalBackend::new("target", "/srv/gutenberg-by-language")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalBackend {
    name: String,
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend.
    ///
    /// The root must be absolute. It is created if it does not exist yet, and
    /// must be a directory if it does.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Only happens once per run; not worth an async constructor.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: IoError, path: &Path) -> ErrorKind {
        match e.kind() {
            IoErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            IoErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn create_parent(absolute: &Path, path: &Path) -> Result<()> {
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, path))?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)?)
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        let abs_path = self.absolute_path(path)?;
        let metadata = fs::metadata(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
        Ok(FileInfo::new(path, metadata.len()))
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Self::create_parent(&abs_path, path).await?;
        Ok(fs::write(&abs_path, data).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn place(&self, source: &Path, path: &Path, transfer: Transfer) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        Self::create_parent(&abs_path, path).await?;
        if transfer == Transfer::Move {
            match fs::rename(source, &abs_path).await {
                Ok(()) => return Ok(()),
                // Renames cannot cross filesystems; fall through to copy and remove.
                Err(e) if e.kind() == IoErrorKind::CrossesDevices => {
                    tracing::debug!(source = %source.display(), "Rename crosses devices, copying instead");
                },
                Err(e) => exn::bail!(Self::map_io_error(e, source)),
            }
        }
        fs::copy(source, &abs_path).await.map_err(|e| Self::map_io_error(e, source))?;
        if transfer == Transfer::Move {
            fs::remove_file(source).await.map_err(|e| Self::map_io_error(e, source))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as sync_fs;

    fn setup() -> (tempfile::TempDir, tempfile::TempDir, LocalBackend) {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new("target", target.path()).unwrap();
        (source, target, backend)
    }

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalBackend::new("target", temp_dir.path()).is_ok());
        assert!(LocalBackend::new("target", "relative/path").is_err());
    }

    #[test]
    fn test_new_rejects_file_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("listing.txt");
        sync_fs::write(&file, b"").unwrap();
        let err = LocalBackend::new("target", &file).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(_)));
    }

    #[test]
    fn test_new_creates_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("by-language");
        LocalBackend::new("target", &root).unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let (_source, target, backend) = setup();
        backend.write(Path::new("listing/out.txt"), b"LANGUAGE en:").await.unwrap();
        assert_eq!(sync_fs::read(target.path().join("listing/out.txt")).unwrap(), b"LANGUAGE en:");
        assert_eq!(backend.stat(Path::new("listing/out.txt")).await.unwrap().size, 12);
    }

    #[tokio::test]
    async fn test_place_copy_keeps_source() {
        let (source, target, backend) = setup();
        let file = source.path().join("1000.txt");
        sync_fs::write(&file, b"Divine Comedy").unwrap();
        backend.place(&file, Path::new("italian/txt/1000.txt"), Transfer::Copy).await.unwrap();
        assert!(file.exists());
        assert_eq!(sync_fs::read(target.path().join("italian/txt/1000.txt")).unwrap(), b"Divine Comedy");
    }

    #[tokio::test]
    async fn test_place_move_removes_source() {
        let (source, _target, backend) = setup();
        let file = source.path().join("1000.txt");
        sync_fs::write(&file, b"Divine Comedy").unwrap();
        backend.place(&file, Path::new("italian/txt/1000.txt"), Transfer::Move).await.unwrap();
        assert!(!file.exists());
        assert!(backend.exists(Path::new("italian/txt/1000.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_place_replaces_existing() {
        let (source, _target, backend) = setup();
        backend.write(Path::new("en/txt/1.txt"), b"old").await.unwrap();
        let file = source.path().join("1.txt");
        sync_fs::write(&file, b"newer contents").unwrap();
        backend.place(&file, Path::new("en/txt/1.txt"), Transfer::Copy).await.unwrap();
        assert_eq!(backend.stat(Path::new("en/txt/1.txt")).await.unwrap().size, 14);
    }

    #[tokio::test]
    async fn test_place_missing_source() {
        let (source, _target, backend) = setup();
        let missing = source.path().join("404.txt");
        for transfer in [Transfer::Copy, Transfer::Move] {
            let err = backend.place(&missing, Path::new("en/txt/404.txt"), transfer).await.unwrap_err();
            assert!(matches!(&*err, ErrorKind::NotFound(p) if p == &missing));
        }
    }

    #[tokio::test]
    async fn test_exists() {
        let (_source, _target, backend) = setup();
        assert!(!backend.exists(Path::new("en/txt/1.txt")).await.unwrap());
        backend.write(Path::new("en/txt/1.txt"), b"data").await.unwrap();
        assert!(backend.exists(Path::new("en/txt/1.txt")).await.unwrap());
        assert!(backend.exists(Path::new("../1.txt")).await.is_err());
    }

    #[tokio::test]
    async fn test_path_security() {
        let (source, _target, backend) = setup();
        let file = source.path().join("1.txt");
        sync_fs::write(&file, b"data").unwrap();
        assert!(backend.write(Path::new("../escape.txt"), b"data").await.is_err());
        assert!(backend.place(&file, Path::new("en/../../1.txt"), Transfer::Copy).await.is_err());
        assert!(file.exists());
    }
}
