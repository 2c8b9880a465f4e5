use certcheck_core::SubmissionRecord;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Record store errors
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record store {path} contains malformed data: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

/// Whole-file JSON store holding the ordered sequence of submissions.
///
/// Does no locking of its own; wrap it in a [`crate::SubmissionRepository`]
/// when it is shared between tasks.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open the store at `path`, creating an empty one if the file is absent.
    pub async fn open(path: impl Into<PathBuf>) -> RecordStoreResult<Self> {
        let store = Self { path: path.into() };
        store.load().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, in stored order.
    ///
    /// Records written without an identifier get one assigned, and the file is
    /// rewritten before returning so the same identifiers are seen by every
    /// later load.
    pub async fn load(&self) -> RecordStoreResult<Vec<SubmissionRecord>> {
        if self.ensure_initialized().await? {
            return Ok(Vec::new());
        }

        let raw = self.read_raw().await?;
        let records = self.parse(&raw)?;
        let missing_ids = self.count_legacy_records(&raw)?;
        if missing_ids > 0 {
            self.save(&records).await?;
            tracing::info!(
                path = %self.path.display(),
                migrated = missing_ids,
                "Assigned identifiers to legacy submission records"
            );
        }
        Ok(records)
    }

    /// Replace the whole store with `records`.
    ///
    /// Writes to a sibling temporary file and renames it into place, so readers
    /// never observe a partially written store.
    pub async fn save(&self, records: &[SubmissionRecord]) -> RecordStoreResult<()> {
        let data = serde_json::to_vec(records).map_err(|source| RecordStoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &data)
            .await
            .map_err(|source| RecordStoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| RecordStoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            size_bytes = data.len(),
            "Record store saved"
        );
        Ok(())
    }

    /// Create the file with an empty sequence if it does not exist yet.
    /// Returns true if the file was created.
    async fn ensure_initialized(&self) -> RecordStoreResult<bool> {
        let exists = fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        self.save(&[]).await?;
        tracing::info!(path = %self.path.display(), "Initialized empty record store");
        Ok(true)
    }

    async fn read_raw(&self) -> RecordStoreResult<Vec<u8>> {
        fs::read(&self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn parse(&self, raw: &[u8]) -> RecordStoreResult<Vec<SubmissionRecord>> {
        serde_json::from_slice(raw).map_err(|source| RecordStoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn count_legacy_records(&self, raw: &[u8]) -> RecordStoreResult<usize> {
        let values: Vec<serde_json::Value> =
            serde_json::from_slice(raw).map_err(|source| RecordStoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        Ok(values.iter().filter(|v| v.get("id").is_none()).count())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> RecordStoreError {
        RecordStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certcheck_core::SubmissionFields;
    use tempfile::tempdir;

    fn record(name: &str, filename: &str) -> SubmissionRecord {
        SubmissionRecord::new(
            SubmissionFields {
                name: name.to_string(),
                branch: "CS".to_string(),
                email: format!("{}@x.com", name.to_lowercase()),
                subject: "Thesis".to_string(),
            },
            filename,
        )
    }

    #[tokio::test]
    async fn test_open_creates_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("details.json");

        let store = RecordStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_order_and_fields() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("details.json"))
            .await
            .unwrap();
        let records = vec![
            record("Alice", "cert.png"),
            record("Bob", "scan.jpg"),
            record("Carol", "id.gif"),
        ];

        store.save(&records).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, records);

        store.save(&loaded).await.unwrap();
        assert_eq!(store.load().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_load_recreates_deleted_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.json");
        let store = RecordStore::open(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(store.load().await.unwrap().is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_malformed_store_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.json");
        std::fs::write(&path, b"{not json").unwrap();

        let result = RecordStore::open(&path).await;
        assert!(matches!(result, Err(RecordStoreError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_open_assigns_stable_ids_to_legacy_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.json");
        std::fs::write(
            &path,
            br#"[{"name":"Alice","branch":"CS","email":"a@x.com","subject":"Thesis","filename":"cert.png"}]"#,
        )
        .unwrap();

        let store = RecordStore::open(&path).await.unwrap();
        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Alice");
        assert_eq!(first[0].id, second[0].id);
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"id\""));
    }

    #[tokio::test]
    async fn test_rows_without_ids_added_after_open_keep_their_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.json");
        let store = RecordStore::open(&path).await.unwrap();
        std::fs::write(
            &path,
            br#"[{"name":"Bob","branch":"EE","email":"b@x.com","subject":"Degree","filename":"scan.jpg"}]"#,
        )
        .unwrap();

        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].filename, "scan.jpg");
        assert!(std::fs::read_to_string(&path).unwrap().contains(&first[0].id.to_string()));
    }

    #[tokio::test]
    async fn test_save_leaves_no_temporary_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("details.json");
        let store = RecordStore::open(&path).await.unwrap();

        store.save(&[record("Alice", "cert.png")]).await.unwrap();

        assert!(!dir.path().join("details.json.tmp").exists());
    }
}
