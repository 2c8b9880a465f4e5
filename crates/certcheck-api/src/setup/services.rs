//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::{Context, Result};
use certcheck_core::Config;
use certcheck_services::{
    ClassificationService, DocumentClassifier, LocalStorage, RecordStore, SubmissionRepository,
    SubmissionService, UploadValidator,
};
use std::sync::Arc;

/// Open the record store and upload directory and wire them to `classifier`
pub async fn initialize_services(
    config: &Config,
    classifier: Arc<dyn DocumentClassifier>,
) -> Result<Arc<AppState>> {
    let store = RecordStore::open(&config.details_file)
        .await
        .with_context(|| format!("Failed to open record store {}", config.details_file.display()))?;
    let repository = SubmissionRepository::new(store);
    let existing = repository.len().await.context("Failed to read record store")?;

    let storage = LocalStorage::new(&config.upload_folder)
        .await
        .context("Failed to prepare upload directory")?;

    let validator = UploadValidator::from_config(config);
    let classification = ClassificationService::new(classifier, config.classifier_threshold);

    tracing::info!(
        details_file = %config.details_file.display(),
        upload_folder = %config.upload_folder.display(),
        records = existing,
        classifier = %classification.classifier_name(),
        threshold = config.classifier_threshold,
        "Services initialized"
    );

    let submissions =
        SubmissionService::new(repository, Arc::new(storage), validator, classification);

    Ok(Arc::new(AppState::new(config.clone(), submissions)))
}
