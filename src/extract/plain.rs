//! Plain text decoding.

use super::{ExtractionError, TextExtractor};
use crate::upload::DocumentKind;

const UTF8_BOM: &str = "\u{FEFF}";

/// Decodes `text/plain` uploads as UTF-8, replacing invalid sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::PlainText
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8_lossy(data);
        Ok(text.strip_prefix(UTF8_BOM).unwrap_or(&text).to_string())
    }
}
