//! Submission service
//!
//! Runs the upload flow: validate → store file → append record → classify.
//! Also lists and deletes past submissions.

use crate::error::SubmissionResult;
use bytes::Bytes;
use certcheck_core::{ClassificationOutcome, SubmissionFields, SubmissionRecord};
use certcheck_db::SubmissionRepository;
use certcheck_processing::{sanitize_filename, ClassificationService, UploadValidator, ValidationError};
use certcheck_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

/// A file part received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Result of an accepted submission
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub record: SubmissionRecord,
    pub index: usize,
    pub outcome: ClassificationOutcome,
}

#[derive(Clone)]
pub struct SubmissionService {
    repository: SubmissionRepository,
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
    classifier: ClassificationService,
}

impl SubmissionService {
    pub fn new(
        repository: SubmissionRepository,
        storage: Arc<dyn Storage>,
        validator: UploadValidator,
        classifier: ClassificationService,
    ) -> Self {
        Self {
            repository,
            storage,
            validator,
            classifier,
        }
    }

    pub fn repository(&self) -> &SubmissionRepository {
        &self.repository
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    pub fn classifier(&self) -> &ClassificationService {
        &self.classifier
    }

    /// Accept a submission and classify its document.
    ///
    /// Rejections happen before anything is written. If the record cannot be
    /// appended the stored file is removed again. A classification failure
    /// leaves the record and file in place.
    #[tracing::instrument(skip(self, owner, file), fields(operation = "submit"))]
    pub async fn submit(
        &self,
        owner: SubmissionFields,
        file: Option<UploadedFile>,
    ) -> SubmissionResult<SubmissionReceipt> {
        let file = file
            .filter(|f| !f.filename.is_empty())
            .ok_or(ValidationError::MissingFile)?;

        self.validator.validate(&file.filename, file.data.len())?;
        let filename = sanitize_filename(&file.filename)
            .ok_or_else(|| ValidationError::InvalidFilename(file.filename.clone()))?;

        tracing::info!(
            original_filename = %file.filename,
            filename = %filename,
            size_bytes = file.data.len(),
            "Processing upload"
        );

        self.storage.upload(&filename, file.data).await?;

        let record = SubmissionRecord::new(owner, filename.clone());
        let index = match self.repository.append(record.clone()).await {
            Ok(index) => index,
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "Failed to append record, removing stored file");
                if let Err(cleanup) = self.storage.delete(&filename).await {
                    tracing::warn!(error = %cleanup, filename = %filename, "Failed to remove orphaned upload");
                }
                return Err(e.into());
            }
        };

        let outcome = self.classify_stored(&filename).await.inspect_err(|e| {
            tracing::error!(error = %e, filename = %filename, index, "Classification failed, record kept");
        })?;

        tracing::info!(
            record_id = %record.id,
            filename = %filename,
            index,
            verdict = %outcome.verdict,
            score = outcome.score,
            "Submission accepted"
        );

        Ok(SubmissionReceipt {
            record,
            index,
            outcome,
        })
    }

    /// Every record, in append order.
    pub async fn list(&self) -> SubmissionResult<Vec<SubmissionRecord>> {
        Ok(self.repository.list().await?)
    }

    pub async fn count(&self) -> SubmissionResult<usize> {
        Ok(self.repository.len().await?)
    }

    /// Delete the stored file of the record at `index`, then the record.
    ///
    /// Out-of-range indices are a no-op returning `None`. The record is
    /// removed by its identifier, so a concurrent delete that shifts positions
    /// cannot make this remove a different record.
    #[tracing::instrument(skip(self), fields(operation = "delete_at"))]
    pub async fn delete_at(&self, index: usize) -> SubmissionResult<Option<SubmissionRecord>> {
        match self.repository.get_at(index).await? {
            Some(record) => self.remove(record).await,
            None => {
                tracing::debug!(index, "No submission at index");
                Ok(None)
            }
        }
    }

    /// Delete the stored file of the record with the given identifier, then the record.
    #[tracing::instrument(skip(self), fields(operation = "delete_by_id"))]
    pub async fn delete_by_id(&self, id: Uuid) -> SubmissionResult<Option<SubmissionRecord>> {
        match self.repository.get(id).await? {
            Some(record) => self.remove(record).await,
            None => Ok(None),
        }
    }

    /// Classify a file already in the upload directory.
    pub async fn classify_stored(&self, filename: &str) -> SubmissionResult<ClassificationOutcome> {
        let data = self.storage.download(filename).await?;
        Ok(self.classifier.classify_bytes(data).await?)
    }

    async fn remove(&self, record: SubmissionRecord) -> SubmissionResult<Option<SubmissionRecord>> {
        self.storage.delete(&record.filename).await?;
        let removed = self.repository.remove_by_id(record.id).await?;
        if removed.is_some() {
            tracing::info!(
                record_id = %record.id,
                filename = %record.filename,
                "Submission deleted"
            );
        }
        Ok(removed)
    }
}

impl std::fmt::Debug for SubmissionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionService")
            .field("records", &self.repository.store().path())
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}
