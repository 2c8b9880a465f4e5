//! Test fixtures: form submissions and image blobs.

use axum_test::multipart::{MultipartForm, Part};

pub use certcheck_processing::test_helpers::sample_png;

/// Owner fields used by the end-to-end scenarios
pub const NAME: &str = "A";
pub const BRANCH: &str = "CS";
pub const EMAIL: &str = "x@x.com";
pub const SUBJECT: &str = "Thesis";

/// The four text fields, without a file part
pub fn owner_fields(name: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name)
        .add_text("branch", BRANCH)
        .add_text("email", EMAIL)
        .add_text("subject", SUBJECT)
}

/// A complete submission carrying `data` as `filename`
pub fn submission(name: &str, filename: &str, data: Vec<u8>) -> MultipartForm {
    owner_fields(name).add_part(
        "file",
        Part::bytes(data)
            .file_name(filename)
            .mime_type("application/octet-stream"),
    )
}

/// A complete submission carrying a valid PNG
pub fn png_submission(name: &str, filename: &str) -> MultipartForm {
    submission(name, filename, sample_png())
}
