//! Route configuration and setup

use crate::constants::{DEFAULT_HTTP_CONCURRENCY_LIMIT, FORM_OVERHEAD_BYTES, STYLESHEET_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use certcheck_core::constants::UPLOADS_URL_PREFIX;
use certcheck_core::Config;
use certcheck_infra::{request_id_middleware, security_headers_middleware, SecurityHeaders};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let pages = Router::new()
        .route("/", get(handlers::pages::home))
        .route("/about", get(handlers::pages::about))
        .route(STYLESHEET_PATH, get(handlers::pages::stylesheet))
        .route(
            "/upload",
            get(handlers::upload::upload_form).post(handlers::upload::upload_document),
        )
        .route("/uploads/{label}/{filename}", get(handlers::result::show_result))
        .route("/view", get(handlers::submissions::list_submissions))
        .route("/delete/{index}", post(handlers::submissions::delete_by_index))
        .route(
            "/submissions/{id}/delete",
            post(handlers::submissions::delete_by_id),
        )
        .route("/health", get(handlers::health::health_check));

    let uploads = ServeDir::new(&config.upload_folder);

    // Server-level concurrency limit to protect against resource exhaustion under extreme load
    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HTTP_CONCURRENCY_LIMIT)
        .max(1);

    let body_limit = config
        .max_file_size_bytes
        .checked_add(FORM_OVERHEAD_BYTES)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Upload limit of {} bytes leaves no room for form fields",
                config.max_file_size_bytes
            )
        })?;
    let timeout = Duration::from_secs(config.base.request_timeout_secs);

    tracing::info!(
        http_concurrency_limit,
        body_limit_bytes = body_limit,
        timeout_secs = timeout.as_secs(),
        "HTTP limits configured"
    );

    let app = pages
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .fallback(handlers::pages::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            SecurityHeaders::for_environment(config.is_production()),
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}
