use crate::store::{RecordStore, RecordStoreResult};
use certcheck_core::SubmissionRecord;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Repository for submission records
///
/// Every operation holds a single lock for its whole load-modify-save cycle,
/// so two concurrent appends (or an append racing a delete) are applied one
/// after the other instead of overwriting each other.
#[derive(Clone)]
pub struct SubmissionRepository {
    store: RecordStore,
    lock: Arc<Mutex<()>>,
}

impl SubmissionRepository {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// All records in append order
    #[tracing::instrument(skip(self), fields(db.operation = "list"))]
    pub async fn list(&self) -> RecordStoreResult<Vec<SubmissionRecord>> {
        let _guard = self.lock.lock().await;
        self.store.load().await
    }

    pub async fn len(&self) -> RecordStoreResult<usize> {
        Ok(self.list().await?.len())
    }

    pub async fn is_empty(&self) -> RecordStoreResult<bool> {
        Ok(self.len().await? == 0)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "get"))]
    pub async fn get(&self, id: Uuid) -> RecordStoreResult<Option<SubmissionRecord>> {
        let records = self.list().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }

    /// The record currently stored at `index`, if any.
    #[tracing::instrument(skip(self), fields(db.operation = "get_at"))]
    pub async fn get_at(&self, index: usize) -> RecordStoreResult<Option<SubmissionRecord>> {
        let mut records = self.list().await?;
        if index >= records.len() {
            return Ok(None);
        }
        Ok(Some(records.swap_remove(index)))
    }

    /// Append a record and return the position it was stored at.
    #[tracing::instrument(
        skip(self, record),
        fields(db.operation = "append", record_id = %record.id, filename = %record.filename)
    )]
    pub async fn append(&self, record: SubmissionRecord) -> RecordStoreResult<usize> {
        self.mutate(|records| {
            records.push(record);
            records.len() - 1
        })
        .await
    }

    /// Remove the record at `index`. Out-of-range indices leave the store untouched.
    #[tracing::instrument(skip(self), fields(db.operation = "remove_at"))]
    pub async fn remove_at(&self, index: usize) -> RecordStoreResult<Option<SubmissionRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;
        if index >= records.len() {
            tracing::debug!(index, len = records.len(), "Delete index out of range, ignoring");
            return Ok(None);
        }
        let removed = records.remove(index);
        self.store.save(&records).await?;
        Ok(Some(removed))
    }

    /// Remove the record with the given identifier, if present.
    #[tracing::instrument(skip(self), fields(db.operation = "remove_by_id"))]
    pub async fn remove_by_id(&self, id: Uuid) -> RecordStoreResult<Option<SubmissionRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;
        let Some(index) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.store.save(&records).await?;
        Ok(Some(removed))
    }

    /// Run `f` against the loaded records and persist the result, all under the lock.
    async fn mutate<F, T>(&self, f: F) -> RecordStoreResult<T>
    where
        F: FnOnce(&mut Vec<SubmissionRecord>) -> T,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.store.load().await?;
        let out = f(&mut records);
        self.store.save(&records).await?;
        Ok(out)
    }
}
