//! PDF text extraction using `pdf-extract`.

use std::panic::{self, AssertUnwindSafe};

use super::{ExtractionError, TextExtractor};
use crate::upload::DocumentKind;

/// Extracts the text layer of a PDF. Scanned pages without a text layer
/// yield nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Pdf
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        if !data.starts_with(b"%PDF-") {
            return Err(ExtractionError::failed(
                DocumentKind::Pdf,
                "missing %PDF- header",
            ));
        }

        // pdf-extract panics on some malformed font tables
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(data)
        }));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::failed(DocumentKind::Pdf, e.to_string())),
            Err(_) => Err(ExtractionError::failed(
                DocumentKind::Pdf,
                "PDF parser panicked",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN_AIR_ACT: &[u8] = include_bytes!("../../tests/fixtures/clean_air_act.pdf");

    #[test]
    fn test_extracts_text_layer() {
        let text = PdfExtractor.extract(CLEAN_AIR_ACT).unwrap();
        assert!(text.contains("Clean Air Act"), "got {:?}", text);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let err = PdfExtractor.extract(b"hello world").unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::ExtractionFailed {
                kind: DocumentKind::Pdf,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_pdf_fails() {
        let err = PdfExtractor.extract(b"%PDF-1.4\n1 0 obj\n<<").unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed { .. }));
    }
}
