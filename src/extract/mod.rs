//! Text extraction from uploaded documents.
//!
//! Each supported [`DocumentKind`] is served by a [`TextExtractor`]:
//! - plain text is decoded directly
//! - PDF goes through `pdf-extract`
//! - Word documents are unpacked with `zip` and read with `quick-xml`
//!
//! The [`ExtractorRegistry`] dispatches on the declared MIME type and applies
//! the shared whitespace normalization.

mod pdf;
mod plain;
mod word;

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::upload::DocumentKind;

pub use pdf::PdfExtractor;
pub use plain::PlainTextExtractor;
pub use word::WordExtractor;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Extraction failed for {kind}: {message}")]
    ExtractionFailed { kind: DocumentKind, message: String },

    #[error("No text found in the file")]
    NoText,
}

impl ExtractionError {
    pub fn failed(kind: DocumentKind, message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            kind,
            message: message.into(),
        }
    }
}

/// A pluggable parser for one document kind.
pub trait TextExtractor: Send + Sync {
    /// Document kind this extractor handles.
    fn kind(&self) -> DocumentKind;

    /// Extract raw (unnormalized) text from the document bytes.
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError>;
}

/// Text pulled out of an upload, already normalized and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub kind: DocumentKind,
}

/// Maps document kinds to their extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<DocumentKind, Arc<dyn TextExtractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let word: Arc<dyn TextExtractor> = Arc::new(WordExtractor::new());
        Self::empty()
            .with(Arc::new(PlainTextExtractor))
            .with(Arc::new(PdfExtractor))
            .with(word.clone())
            .with_for(DocumentKind::LegacyWord, word)
    }
}

impl ExtractorRegistry {
    /// Registry with the built-in extractors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Register an extractor for the kind it reports.
    pub fn with(self, extractor: Arc<dyn TextExtractor>) -> Self {
        let kind = extractor.kind();
        self.with_for(kind, extractor)
    }

    /// Register an extractor for an explicit kind.
    pub fn with_for(mut self, kind: DocumentKind, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors.insert(kind, extractor);
        self
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&Arc<dyn TextExtractor>> {
        self.extractors.get(&kind)
    }

    /// Extract text from a file based on its declared MIME type.
    pub fn extract(&self, mime_type: &str, data: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let kind = DocumentKind::from_mime(mime_type)
            .ok_or_else(|| ExtractionError::UnsupportedFileType(mime_type.to_string()))?;
        self.extract_kind(kind, data)
    }

    /// Extract text for an already classified document.
    pub fn extract_kind(
        &self,
        kind: DocumentKind,
        data: &[u8],
    ) -> Result<ExtractedText, ExtractionError> {
        let extractor = self
            .get(kind)
            .ok_or_else(|| ExtractionError::UnsupportedFileType(kind.mime_type().to_string()))?;

        let raw = extractor.extract(data)?;
        let text = normalize_text(&raw);
        if text.is_empty() {
            return Err(ExtractionError::NoText);
        }

        tracing::debug!(
            "Extracted {} chars from {} bytes of {}",
            text.chars().count(),
            data.len(),
            kind
        );
        Ok(ExtractedText { text, kind })
    }
}

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalize extracted text: CRLF to LF, collapse runs of three or more
/// newlines into a single blank line, then trim.
pub fn normalize_text(text: &str) -> String {
    let unix = text.replace("\r\n", "\n");
    BLANK_RUN.replace_all(&unix, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_crlf() {
        assert_eq!(normalize_text("a\r\nb\r\nc"), "a\nb\nc");
    }

    #[test]
    fn test_normalize_collapses_blank_runs() {
        assert_eq!(normalize_text("a\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\n\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_text("a\r\n\r\n\r\nb"), "a\n\nb");
        // A single blank line is left alone
        assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize_text("\n\n  Section 1  \n\t"), "Section 1");
        assert_eq!(normalize_text(" \r\n \n"), "");
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize_text("a  b\n \n \nc"), "a  b\n \n \nc");
    }

    #[test]
    fn test_registry_plain_text() {
        let registry = ExtractorRegistry::new();
        let result = registry
            .extract("text/plain", b"Clean Air Act\r\n\r\n\r\n\r\nSection 1\r\n")
            .unwrap();
        assert_eq!(result.text, "Clean Air Act\n\nSection 1");
        assert_eq!(result.kind, DocumentKind::PlainText);
    }

    #[test]
    fn test_registry_unsupported() {
        let registry = ExtractorRegistry::new();
        let err = registry.extract("image/png", b"\x89PNG").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_registry_empty_text() {
        let registry = ExtractorRegistry::new();
        let err = registry.extract("text/plain", b"  \r\n\r\n ").unwrap_err();
        assert!(matches!(err, ExtractionError::NoText));
    }

    #[test]
    fn test_registry_missing_extractor() {
        let registry = ExtractorRegistry::empty().with(Arc::new(PlainTextExtractor));
        let err = registry.extract("application/pdf", b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFileType(_)));
    }

    #[test]
    fn test_registry_legacy_word_uses_word_parser() {
        let registry = ExtractorRegistry::new();
        let err = registry
            .extract("application/msword", b"\xD0\xCF\x11\xE0 not a zip")
            .unwrap_err();
        match err {
            ExtractionError::ExtractionFailed { kind, .. } => {
                assert_eq!(kind, DocumentKind::Word)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
