use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use certcheck_core::{ErrorMetadata, SubmissionFields};
use certcheck_processing::ValidationError;
use certcheck_services::{SubmissionError, UploadedFile};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::views;

/// Parsed multipart upload form
#[derive(Debug, Default)]
struct UploadForm {
    name: Option<String>,
    branch: Option<String>,
    email: Option<String>,
    subject: Option<String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(field_name) = field.name().map(str::to_string) else {
                continue;
            };

            match field_name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    // Browsers send an unnamed empty part when no file was chosen
                    if !filename.is_empty() {
                        form.file = Some(UploadedFile::new(filename, data));
                    }
                }
                "name" => form.name = Some(field.text().await?),
                "branch" => form.branch = Some(field.text().await?),
                "email" => form.email = Some(field.text().await?),
                "subject" => form.subject = Some(field.text().await?),
                other => {
                    tracing::debug!(field = %other, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }

    /// Whatever was entered, for re-rendering the form
    fn entered(&self) -> SubmissionFields {
        SubmissionFields {
            name: self.name.clone().unwrap_or_default(),
            branch: self.branch.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            subject: self.subject.clone().unwrap_or_default(),
        }
    }

    fn into_parts(self) -> Result<(SubmissionFields, Option<UploadedFile>), ValidationError> {
        let required = |value: Option<String>, field: &str| {
            value.ok_or_else(|| ValidationError::MissingField(field.to_string()))
        };
        let file = self.file;
        let fields = SubmissionFields {
            name: required(self.name, "name")?,
            branch: required(self.branch, "branch")?,
            email: required(self.email, "email")?,
            subject: required(self.subject, "subject")?,
        };
        Ok((fields, file))
    }
}

/// GET /upload
pub async fn upload_form() -> Html<String> {
    Html(views::upload_form(&SubmissionFields::default(), None))
}

/// POST /upload
///
/// Accepts the multipart form, stores and classifies the document, then
/// redirects to the result page. Rejected uploads re-render the form with the
/// reason and nothing is stored.
///
/// # Errors
/// - 400/413 with the form re-rendered when the upload is rejected
/// - 500 when storage, the record store or the classifier fails
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_document"))]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let form = UploadForm::read(multipart).await?;
    let entered = form.entered();

    let result = match form.into_parts() {
        Ok((fields, file)) => state.submissions.submit(fields, file).await,
        Err(e) => Err(SubmissionError::Rejected(e)),
    };

    match result {
        Ok(receipt) => {
            let location = views::result_path(receipt.outcome.verdict, &receipt.record.filename);
            Ok(Redirect::to(&location).into_response())
        }
        Err(SubmissionError::Rejected(reason)) => {
            tracing::info!(reason = %reason, "Upload rejected");
            let err = HttpAppError::from(reason);
            let page = views::upload_form(&entered, Some(&err.0.client_message()));
            Ok((err.status(), Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
