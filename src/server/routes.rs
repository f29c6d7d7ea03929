//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // JSON API
        .route("/api/extract-text", post(handlers::extract_text))
        .route("/api/simplify", post(handlers::simplify))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
