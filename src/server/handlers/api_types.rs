//! JSON bodies returned by the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Successful extraction: `{ "text": "..." }`.
#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// Build an error response with a public message.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn internal_error() -> Response {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}
