//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use certcheck_core::Config;
use certcheck_infra::{LogFormat, TelemetryConfig};
use certcheck_services::OnnxClassifier;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    let format = if config.is_production() {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    certcheck_infra::init_telemetry(
        &TelemetryConfig::new("certcheck-api", config.base.environment.clone()).with_format(format),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.base.environment,
        extension_match = %config.extension_match,
        "Configuration loaded and validated successfully"
    );

    // Load the model once; every request shares it
    let model_path = config.model_path.clone();
    let classifier = tokio::task::spawn_blocking(move || OnnxClassifier::load(model_path))
        .await
        .context("Model loading task failed")?
        .context("Failed to load classifier model")?;

    let state = services::initialize_services(&config, Arc::new(classifier)).await?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
