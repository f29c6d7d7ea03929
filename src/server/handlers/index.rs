//! Index page and health check.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};

use super::super::template_structs::IndexTemplate;
use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// The upload and paste form.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let template = IndexTemplate::new(state.max_upload_bytes);
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}
