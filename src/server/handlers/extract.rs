//! Document text extraction endpoint.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::api_types::{api_error, internal_error, ExtractTextResponse};
use crate::extract::ExtractionError;
use crate::upload::{DocumentKind, UploadError, UploadedFile};
use crate::server::AppState;

const FILE_FIELD: &str = "file";

/// Map an extraction failure to a status and public message.
fn extraction_error_status(err: &ExtractionError) -> (StatusCode, &'static str) {
    match err {
        ExtractionError::UnsupportedFileType(_) => {
            (StatusCode::BAD_REQUEST, "Unsupported file type")
        }
        ExtractionError::NoText => (StatusCode::BAD_REQUEST, "No text found in the file"),
        ExtractionError::ExtractionFailed { kind, .. } => match kind {
            DocumentKind::Pdf => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract text from PDF",
            ),
            DocumentKind::Word | DocumentKind::LegacyWord => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract text from document",
            ),
            DocumentKind::PlainText => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        },
    }
}

fn too_large(size: u64, limit: u64) -> Response {
    api_error(
        StatusCode::PAYLOAD_TOO_LARGE,
        UploadError::TooLarge { size, limit }.to_string(),
    )
}

enum ReadError {
    TooLarge,
    Malformed(String),
}

/// Pull the `file` field out of the form. Other fields are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ReadError> {
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ReadError::TooLarge
            } else {
                ReadError::Malformed(e.body_text())
            }
        })?;

        let Some(field) = field else {
            return Ok(None);
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or(FILE_FIELD).to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ReadError::TooLarge
            } else {
                ReadError::Malformed(e.body_text())
            }
        })?;

        return Ok(Some(UploadedFile::new(name, mime_type, data.to_vec())));
    }
}

/// Extract text from an uploaded document.
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Text extraction error: {}", e.body_text());
            return internal_error();
        }
    };

    let upload = match read_file_field(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            tracing::debug!("Extraction request without a file field");
            return api_error(StatusCode::BAD_REQUEST, "No file provided");
        }
        Err(ReadError::TooLarge) => {
            tracing::warn!("Upload exceeded the request body limit");
            return too_large(state.max_upload_bytes.saturating_add(1), state.max_upload_bytes);
        }
        Err(ReadError::Malformed(message)) => {
            tracing::error!("Text extraction error: {}", message);
            return internal_error();
        }
    };

    if upload.size() > state.max_upload_bytes {
        tracing::warn!(
            "Rejected {} ({} bytes): over the {} byte limit",
            upload.name,
            upload.size(),
            state.max_upload_bytes
        );
        return too_large(upload.size(), state.max_upload_bytes);
    }

    let extractors = state.extractors.clone();
    let name = upload.name.clone();
    let result = tokio::task::spawn_blocking(move || {
        extractors.extract(&upload.mime_type, &upload.content)
    })
    .await;

    match result {
        Ok(Ok(extracted)) => {
            tracing::info!(
                "Extracted {} chars from {} ({})",
                extracted.text.chars().count(),
                name,
                extracted.kind
            );
            Json(ExtractTextResponse {
                text: extracted.text,
            })
            .into_response()
        }
        Ok(Err(e)) => {
            let (status, message) = extraction_error_status(&e);
            if status.is_server_error() {
                tracing::error!("Text extraction failed for {}: {}", name, e);
            } else {
                tracing::debug!("Rejected upload {}: {}", name, e);
            }
            api_error(status, message)
        }
        Err(e) => {
            tracing::error!("Text extraction task failed for {}: {}", name, e);
            internal_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            extraction_error_status(&ExtractionError::UnsupportedFileType("x/y".into())),
            (StatusCode::BAD_REQUEST, "Unsupported file type")
        );
        assert_eq!(
            extraction_error_status(&ExtractionError::NoText),
            (StatusCode::BAD_REQUEST, "No text found in the file")
        );
        assert_eq!(
            extraction_error_status(&ExtractionError::failed(DocumentKind::LegacyWord, "bad")),
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to extract text from document"
            )
        );
        assert_eq!(
            extraction_error_status(&ExtractionError::failed(DocumentKind::Pdf, "bad")).1,
            "Failed to extract text from PDF"
        );
    }
}
