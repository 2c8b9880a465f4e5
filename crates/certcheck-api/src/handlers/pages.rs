//! Static pages

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use certcheck_core::AppError;

use crate::error::HttpAppError;
use crate::views;

/// GET /
pub async fn home() -> Html<String> {
    Html(views::home())
}

/// GET /about
pub async fn about() -> Html<String> {
    Html(views::about())
}

/// GET /static/style.css
pub async fn stylesheet() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        views::STYLESHEET,
    )
        .into_response()
}

pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Page not found".to_string()))
}
