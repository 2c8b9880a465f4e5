use axum::{extract::Path, response::Html};
use certcheck_core::{AppError, Verdict};

use crate::error::HttpAppError;
use crate::views;

/// GET /uploads/{label}/{filename}
///
/// Shows the verdict for an upload next to the stored image. Labels other
/// than `Real` and `Fake` are not found.
#[tracing::instrument(fields(operation = "show_result"))]
pub async fn show_result(
    Path((label, filename)): Path<(String, String)>,
) -> Result<Html<String>, HttpAppError> {
    let verdict: Verdict = label
        .parse()
        .map_err(|_| HttpAppError(AppError::NotFound(format!("Unknown result '{}'", label))))?;

    Ok(Html(views::result(verdict, &filename)))
}
