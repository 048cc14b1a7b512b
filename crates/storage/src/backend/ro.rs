//! Read-only storage backend decorator.
//!
//! Wraps another backend, passes queries through, and turns every mutation
//! into a logged no-op that reports success. The organizer's dry run is built
//! on it.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::models::{FileInfo, Transfer};
use crate::{BackendHandle, StorageBackend};

/// Read-only storage backend.
///
/// Silently drops all mutations, logging an [`info event`](tracing::Event)
/// for each one.
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path).await
    }

    async fn stat(&self, path: &Path) -> Result<FileInfo> {
        self.inner.stat(path).await
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        tracing::info!(path = %path.display(), bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    async fn place(&self, source: &Path, path: &Path, transfer: Transfer) -> Result<()> {
        tracing::info!(
            source = %source.display(),
            path = %path.display(),
            transfer = transfer.as_str(),
            "Skipping {} during read-only mode",
            transfer.as_str()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LocalBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_mutations_are_skipped() {
        let source = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let file = source.path().join("1000.txt");
        std::fs::write(&file, b"Divine Comedy").unwrap();
        let inner = Arc::new(LocalBackend::new("target", target.path()).unwrap());
        let backend = ReadOnlyBackend::new(inner.clone());

        backend.place(&file, Path::new("it/txt/1000.txt"), Transfer::Move).await.unwrap();
        backend.write(Path::new("listing.txt"), b"data").await.unwrap();
        assert!(file.exists());
        assert!(!inner.exists(Path::new("it/txt/1000.txt")).await.unwrap());
        assert!(!inner.exists(Path::new("listing.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_queries_pass_through() {
        let target = tempfile::tempdir().unwrap();
        let inner = Arc::new(LocalBackend::new("target", target.path()).unwrap());
        inner.write(Path::new("en/txt/1.txt"), b"data").await.unwrap();
        let backend = ReadOnlyBackend::new(inner.clone());
        assert_eq!(backend.name(), "target");
        assert!(backend.exists(Path::new("en/txt/1.txt")).await.unwrap());
        assert_eq!(backend.stat(Path::new("en/txt/1.txt")).await.unwrap().size, 4);
    }
}
