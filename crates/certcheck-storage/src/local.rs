use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Upload directory on the local filesystem
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Use `base_path` as the upload directory, creating it if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Cannot create upload directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %base_path.display(), "Upload directory ready");
        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to a file directly inside the upload directory.
    ///
    /// Keys are single path components; anything that could name a file
    /// elsewhere is refused.
    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        let flat = !key.is_empty() && key != "." && key != ".." && !key.contains(['/', '\\']);
        if !flat {
            return Err(StorageError::InvalidKey(format!(
                "'{}' is not a plain file name",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }

    async fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(data).await?;
        file.sync_all().await
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Bytes) -> StorageResult<String> {
        let path = self.resolve(key)?;
        let start = Instant::now();

        Self::write_file(&path, &data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Cannot write {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored upload"
        );
        Ok(key.to_string())
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(key)?;

        match fs::read(&path).await {
            Ok(data) => {
                tracing::debug!(key = %key, size_bytes = data.len(), "Read stored upload");
                Ok(data)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(key = %key, "Removed stored upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Stored upload already absent");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Cannot remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn local_path(&self, key: &str) -> Option<PathBuf> {
        self.resolve(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    async fn storage() -> (TempDir, LocalStorage) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_stored_upload_reads_back() {
        let (dir, storage) = storage().await;

        let key = storage
            .upload("cert.png", Bytes::from_static(b"png bytes"))
            .await
            .unwrap();

        assert_eq!(key, "cert.png");
        assert_eq!(storage.download(&key).await.unwrap(), b"png bytes");
        assert_eq!(storage.local_path(&key), Some(dir.path().join("cert.png")));
    }

    #[tokio::test]
    async fn test_same_key_is_overwritten() {
        let (_dir, storage) = storage().await;

        storage.upload("cert.png", Bytes::from_static(b"first")).await.unwrap();
        storage.upload("cert.png", Bytes::from_static(b"second")).await.unwrap();

        assert_eq!(storage.download("cert.png").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_keys_outside_upload_dir_refused() {
        let (_dir, storage) = storage().await;

        for key in ["../secrets.json", "nested/cert.png", "/etc/hosts", "..\\x.png", ""] {
            assert!(
                matches!(storage.download(key).await, Err(StorageError::InvalidKey(_))),
                "{:?} should be refused",
                key
            );
        }
        assert!(matches!(
            storage.delete("../details.json").await,
            Err(StorageError::InvalidKey(_))
        ));
        assert_eq!(storage.local_path("nested/cert.png"), None);
    }

    #[tokio::test]
    async fn test_delete_missing_upload_succeeds() {
        let (_dir, storage) = storage().await;
        assert!(storage.delete("never-stored.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_then_download_is_not_found() {
        let (_dir, storage) = storage().await;

        storage.upload("scan.jpg", Bytes::from_static(b"jpg")).await.unwrap();
        assert!(storage.exists("scan.jpg").await.unwrap());

        storage.delete("scan.jpg").await.unwrap();
        assert!(!storage.exists("scan.jpg").await.unwrap());
        assert!(matches!(
            storage.download("scan.jpg").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_new_creates_nested_upload_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("static").join("uploads");

        let storage = LocalStorage::new(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(storage.base_path(), nested.as_path());
    }
}
