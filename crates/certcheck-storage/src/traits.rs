//! Upload storage seam

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing stored uploads
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not store upload: {0}")]
    UploadFailed(String),

    #[error("Could not read stored upload: {0}")]
    DownloadFailed(String),

    #[error("Could not remove stored upload: {0}")]
    DeleteFailed(String),

    #[error("No stored upload named {0}")]
    NotFound(String),

    #[error("Invalid upload key: {0}")]
    InvalidKey(String),

    #[error("Upload directory I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Upload directory unusable: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage for uploaded files
///
/// Writing to an existing key replaces its content; there is no uniqueness
/// guarantee beyond the key itself.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `key`, replacing any existing file. Returns the key.
    async fn upload(&self, key: &str, data: Bytes) -> StorageResult<String>;

    /// Read the file stored under `key`
    async fn download(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete the file stored under `key`. A missing file is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Filesystem location of `key`, for backends that keep files on local disk
    fn local_path(&self, key: &str) -> Option<PathBuf>;
}
