//! Askama template structs for the web interface.

use askama::Template;

use crate::upload::{format_limit, ACCEPTED_EXTENSIONS, ACCEPTED_MIME_TYPES};

/// The single-page upload and paste form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Value for the file input's `accept` attribute.
    pub accept: String,
    /// Comma-separated MIME types the client checks before uploading.
    pub accepted_types: String,
    pub max_upload_bytes: u64,
    /// Human form of the limit, e.g. "10MB".
    pub max_upload_label: String,
}

impl IndexTemplate {
    pub fn new(max_upload_bytes: u64) -> Self {
        Self {
            accept: ACCEPTED_EXTENSIONS.join(","),
            accepted_types: ACCEPTED_MIME_TYPES.join(","),
            max_upload_bytes,
            max_upload_label: format_limit(max_upload_bytes),
        }
    }
}
