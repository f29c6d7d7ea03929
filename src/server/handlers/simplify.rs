//! Policy analysis endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::api_types::{api_error, internal_error};
use crate::analysis::{AnalysisError, TEXT_REQUIRED_MESSAGE};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
struct SimplifyRequest {
    #[serde(default)]
    text: Option<String>,
}

/// Summarize policy text into plain English with pros and cons.
pub async fn simplify(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SimplifyRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("Rejected simplify body: {}", e);
            return api_error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    let Some(text) = request.text.filter(|t| !t.trim().is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, TEXT_REQUIRED_MESSAGE);
    };

    match state.simplifier.simplify(&text).await {
        Ok(result) => Json(result).into_response(),
        Err(AnalysisError::InvalidInput(message)) => api_error(StatusCode::BAD_REQUEST, message),
        // Already logged by the simplifier
        Err(AnalysisError::Generation(_)) => internal_error(),
    }
}
