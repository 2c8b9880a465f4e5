//! certcheck Processing Library
//!
//! Upload validation, filename sanitization, image preprocessing, and the
//! classifier adapter around the pre-trained document model.

pub mod classifier;
pub mod filename;
pub mod imaging;
pub mod validator;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use classifier::{ClassificationService, ClassifyError, DocumentClassifier, OnnxClassifier};
pub use filename::sanitize_filename;
pub use imaging::{preprocess, ImageTensor};
pub use validator::{UploadValidator, ValidationError};
