use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
    pub classifier: String,
}

/// GET /health
///
/// Reports liveness along with the number of stored records, which also
/// proves the record store is readable.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, HttpAppError> {
    let records = state.submissions.count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        records,
        classifier: state.submissions.classifier().classifier_name().to_string(),
    }))
}
