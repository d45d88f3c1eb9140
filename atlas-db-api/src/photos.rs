//! Photo storage capability.
//!
//! The store and service treat photo blobs as external: all they need
//! is `store(bytes, extension) -> url`. [`DirPhotoStore`] is the
//! directory-backed implementation; deleted features orphan their blobs
//! (the core never reclaims them).

use crate::error::{ApiError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// `store(bytes, extension) -> url` capability.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store one photo payload, returning its public URL.
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String>;
}

/// Directory-backed photo store with content-addressed names.
///
/// Files are named by the SHA-256 of their bytes plus the original
/// extension, so re-uploading identical content is idempotent.
pub struct DirPhotoStore {
    root: PathBuf,
    url_prefix: String,
}

impl DirPhotoStore {
    /// `root` is where files land; `url_prefix` (e.g. `/photos`) is
    /// prepended to file names to form the returned URLs.
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into(),
        }
    }
}

#[async_trait]
impl PhotoStore for DirPhotoStore {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        let digest = hex::encode(Sha256::digest(bytes));
        let ext = extension.trim().trim_start_matches('.');
        let file_name = if ext.is_empty() {
            digest
        } else {
            format!("{digest}.{ext}")
        };

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ApiError::Photo(e.to_string()))?;
        tokio::fs::write(self.root.join(&file_name), bytes)
            .await
            .map_err(|e| ApiError::Photo(e.to_string()))?;

        Ok(format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_content_addressed_file() {
        let dir = tempfile::tempdir().unwrap();
        let photos = DirPhotoStore::new(dir.path(), "/photos/");

        let url = photos.store(b"fake jpeg bytes", ".jpg").await.unwrap();
        assert!(url.starts_with("/photos/"));
        assert!(url.ends_with(".jpg"));

        let file_name = url.strip_prefix("/photos/").unwrap();
        let on_disk = tokio::fs::read(dir.path().join(file_name)).await.unwrap();
        assert_eq!(on_disk, b"fake jpeg bytes");

        // Same bytes, same URL.
        let again = photos.store(b"fake jpeg bytes", "jpg").await.unwrap();
        assert_eq!(url, again);
    }
}
