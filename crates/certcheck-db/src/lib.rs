//! certcheck record persistence
//!
//! Submissions are kept as one ordered JSON array in a single file. The
//! [`RecordStore`] reads and rewrites that file wholesale; the
//! [`SubmissionRepository`] serializes every load-modify-save cycle so
//! concurrent requests cannot lose each other's updates.

pub mod repository;
pub mod store;

pub use repository::SubmissionRepository;
pub use store::{RecordStore, RecordStoreError, RecordStoreResult};
