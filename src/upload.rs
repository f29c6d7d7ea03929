//! Upload classification and validation.
//!
//! Decides which document kinds are accepted and enforces the upload size cap
//! before any extraction or network work happens.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Default upload size cap (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_MSWORD: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME types accepted for upload, in display order.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[MIME_PLAIN_TEXT, MIME_PDF, MIME_MSWORD, MIME_DOCX];

/// File extensions offered by the upload picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".txt", ".pdf", ".doc", ".docx"];

/// Message shown when the declared type is not accepted.
pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Please upload a text file, PDF, or Word document";

/// Kind of document an upload holds, derived from its declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    PlainText,
    Pdf,
    /// Office Open XML (.docx).
    Word,
    /// Pre-2007 binary Word (.doc).
    LegacyWord,
}

impl DocumentKind {
    /// Classify a declared MIME type. Parameters and case are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime_essence(mime).as_str() {
            MIME_PLAIN_TEXT => Some(Self::PlainText),
            MIME_PDF => Some(Self::Pdf),
            MIME_DOCX => Some(Self::Word),
            MIME_MSWORD => Some(Self::LegacyWord),
            _ => None,
        }
    }

    /// Guess the kind of a local file from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let guess = mime_guess::from_path(path).first()?;
        Self::from_mime(guess.essence_str())
    }

    /// Canonical MIME type for this kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => MIME_PLAIN_TEXT,
            Self::Pdf => MIME_PDF,
            Self::Word => MIME_DOCX,
            Self::LegacyWord => MIME_MSWORD,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "text",
            Self::Pdf => "pdf",
            Self::Word => "docx",
            Self::LegacyWord => "doc",
        };
        f.write_str(name)
    }
}

/// Strip MIME parameters, surrounding whitespace and case.
pub fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Reasons an upload is refused before it is processed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload a text file, PDF, or Word document")]
    UnsupportedType(String),

    #[error("File size must be less than {}", format_limit(*.limit))]
    TooLarge { size: u64, limit: u64 },
}

/// A file selected for upload, before any processing.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Read a local file, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_type, content))
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Validate type then size, in that order.
    pub fn validate(&self, max_bytes: u64) -> Result<DocumentKind, UploadError> {
        validate_upload(&self.mime_type, self.size(), max_bytes)
    }
}

/// Check a declared type and size against the upload rules.
pub fn validate_upload(mime: &str, size: u64, max_bytes: u64) -> Result<DocumentKind, UploadError> {
    let kind = DocumentKind::from_mime(mime)
        .ok_or_else(|| UploadError::UnsupportedType(mime.to_string()))?;
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(kind)
}

/// Format a byte limit the way the upload form describes it (e.g. "10MB").
pub fn format_limit(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime_accepted_types() {
        assert_eq!(
            DocumentKind::from_mime("text/plain"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_mime("application/pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::from_mime(MIME_DOCX), Some(DocumentKind::Word));
        assert_eq!(
            DocumentKind::from_mime("application/msword"),
            Some(DocumentKind::LegacyWord)
        );
    }

    #[test]
    fn test_from_mime_ignores_params_and_case() {
        assert_eq!(
            DocumentKind::from_mime("Text/Plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_mime(" APPLICATION/PDF "),
            Some(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_from_mime_rejects_others() {
        assert_eq!(DocumentKind::from_mime("image/png"), None);
        assert_eq!(DocumentKind::from_mime("text/html"), None);
        assert_eq!(DocumentKind::from_mime("application/octet-stream"), None);
        assert_eq!(DocumentKind::from_mime(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            DocumentKind::from_path(Path::new("bill.txt")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("bill.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("bill.docx")),
            Some(DocumentKind::Word)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("bill.doc")),
            Some(DocumentKind::LegacyWord)
        );
        assert_eq!(DocumentKind::from_path(Path::new("bill.png")), None);
    }

    #[test]
    fn test_validate_over_limit() {
        let limit = DEFAULT_MAX_UPLOAD_BYTES;
        let err = validate_upload("application/pdf", limit + 1, limit).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                size: limit + 1,
                limit
            }
        );
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_validate_at_limit_is_accepted() {
        let limit = DEFAULT_MAX_UPLOAD_BYTES;
        assert_eq!(
            validate_upload("application/pdf", limit, limit),
            Ok(DocumentKind::Pdf)
        );
    }

    #[test]
    fn test_validate_type_checked_first() {
        let err = validate_upload("image/png", u64::MAX, 10).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
        assert_eq!(err.to_string(), UNSUPPORTED_TYPE_MESSAGE);
    }

    #[test]
    fn test_uploaded_file_validate() {
        let file = UploadedFile::new("a.txt", "text/plain", b"hello".to_vec());
        assert_eq!(file.size(), 5);
        assert_eq!(file.validate(5), Ok(DocumentKind::PlainText));
        assert!(file.validate(4).is_err());
    }

    #[test]
    fn test_format_limit() {
        assert_eq!(format_limit(10 * 1024 * 1024), "10MB");
        assert_eq!(format_limit(1536 * 1024), "1.5MB");
        assert_eq!(format_limit(2048), "2KB");
        assert_eq!(format_limit(12), "12B");
    }
}
