//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors
//! convert into `HttpAppError` through the `From` impls below and render as an
//! HTML error page with the status the error declares.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use certcheck_core::{AppError, ErrorMetadata, LogLevel};
use certcheck_db::RecordStoreError;
use certcheck_processing::{ClassifyError, ValidationError};
use certcheck_services::SubmissionError;
use certcheck_storage::StorageError;

use crate::views;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from certcheck-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl HttpAppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status = self.status();

        log_error(app_error);

        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let page = views::error_page(
            status,
            app_error.error_code(),
            &app_error.client_message(),
            details.as_deref(),
        );

        (status, Html(page)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::UploadFailed(msg)
            | StorageError::DownloadFailed(msg)
            | StorageError::DeleteFailed(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { size, max } => {
                AppError::PayloadTooLarge(format!("{} bytes exceeds max {} bytes", size, max))
            }
            ValidationError::InvalidExtension { extension, allowed } => AppError::InvalidInput(
                format!(
                    "File type '{}' is not allowed (allowed: {})",
                    extension,
                    allowed.join(", ")
                ),
            ),
            ValidationError::InvalidFilename(name) => AppError::InvalidInput(format!(
                "'{}' is not an acceptable file name",
                name
            )),
            ValidationError::MissingFile => {
                AppError::InvalidInput("Please choose a file to upload".to_string())
            }
            ValidationError::MissingField(field) => {
                AppError::InvalidInput(format!("The '{}' field is required", field))
            }
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

impl From<RecordStoreError> for HttpAppError {
    fn from(err: RecordStoreError) -> Self {
        HttpAppError(AppError::RecordStore(err.to_string()))
    }
}

impl From<ClassifyError> for HttpAppError {
    fn from(err: ClassifyError) -> Self {
        let app = match err {
            ClassifyError::Decode(msg) => AppError::ImageDecode(msg),
            other => AppError::Classification(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<SubmissionError> for HttpAppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Rejected(e) => e.into(),
            SubmissionError::Storage(e) => e.into(),
            SubmissionError::Records(e) => e.into(),
            SubmissionError::Classification(e) => e.into(),
        }
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        };
        HttpAppError(app)
    }
}
