//! certcheck Services Layer
//!
//! Orchestrates the upload flow across the record store, the upload directory
//! and the classifier, and re-exports the pieces the API and CLI need so they
//! depend on a single service facade.

pub mod error;
pub mod submission;

pub use certcheck_db::{RecordStore, RecordStoreError, SubmissionRepository};
pub use certcheck_processing::{
    ClassificationService, ClassifyError, DocumentClassifier, ImageTensor, OnnxClassifier,
    UploadValidator, ValidationError,
};
pub use certcheck_storage::{LocalStorage, Storage, StorageError};
pub use error::{SubmissionError, SubmissionResult};
pub use submission::{SubmissionReceipt, SubmissionService, UploadedFile};
