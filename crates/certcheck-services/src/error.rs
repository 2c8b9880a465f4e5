use certcheck_db::RecordStoreError;
use certcheck_processing::{ClassifyError, ValidationError};
use certcheck_storage::StorageError;

/// Failures of the submission flow, tagged by the stage that produced them
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Upload rejected: {0}")]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Records(#[from] RecordStoreError),

    #[error(transparent)]
    Classification(#[from] ClassifyError),
}

impl SubmissionError {
    /// True when the request was refused before anything was written
    pub fn is_rejection(&self) -> bool {
        matches!(self, SubmissionError::Rejected(_))
    }
}

pub type SubmissionResult<T> = Result<T, SubmissionError>;
