use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use certcheck_core::AppError;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::views;

const LIST_PATH: &str = "/view";

/// GET /view
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, HttpAppError> {
    let records = state.submissions.list().await?;
    Ok(Html(views::submissions(&records)))
}

/// POST /delete/{index}
///
/// Positional delete. Indices past the end are ignored and still redirect
/// back to the list. Anything that is not a non-negative integer is not found.
#[tracing::instrument(skip(state), fields(operation = "delete_by_index"))]
pub async fn delete_by_index(
    State(state): State<Arc<AppState>>,
    Path(index): Path<String>,
) -> Result<Redirect, HttpAppError> {
    let index: usize = index
        .parse()
        .map_err(|_| HttpAppError(AppError::NotFound(format!("No submission at '{}'", index))))?;

    if state.submissions.delete_at(index).await?.is_none() {
        tracing::debug!(index, "No submission at index, nothing deleted");
    }
    Ok(Redirect::to(LIST_PATH))
}

/// POST /submissions/{id}/delete
#[tracing::instrument(skip(state), fields(operation = "delete_by_id"))]
pub async fn delete_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect, HttpAppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| HttpAppError(AppError::NotFound(format!("No submission '{}'", id))))?;

    if state.submissions.delete_by_id(id).await?.is_none() {
        tracing::debug!(%id, "Submission already gone, nothing deleted");
    }
    Ok(Redirect::to(LIST_PATH))
}
