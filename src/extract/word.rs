//! Word (.docx) text extraction.
//!
//! A .docx file is a zip archive; the body lives in `word/document.xml`.
//! Only visible text runs are kept, laid out the way a raw-text export
//! would show them: tabs and line breaks inside paragraphs, a blank line
//! between paragraphs. Paragraph properties are skipped, and of each
//! `mc:AlternateContent` only the `mc:Fallback` branch is read.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{ExtractionError, TextExtractor};
use crate::upload::DocumentKind;

const DOCUMENT_PART: &str = "word/document.xml";

/// Elements whose whole subtree carries no visible text.
const SKIPPED_ELEMENTS: &[&[u8]] = &[b"w:pPr", b"mc:Choice"];

/// Extracts raw text from Office Open XML word-processing documents.
#[derive(Debug, Clone)]
pub struct WordExtractor {
    /// Upper bound on the uncompressed size of `word/document.xml`.
    max_part_bytes: u64,
}

impl Default for WordExtractor {
    fn default() -> Self {
        Self {
            max_part_bytes: 256 * 1024 * 1024,
        }
    }
}

impl WordExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_part_bytes(mut self, max: u64) -> Self {
        self.max_part_bytes = max;
        self
    }

    fn read_document_part(&self, data: &[u8]) -> Result<Vec<u8>, ExtractionError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| fail(format!("not a Word document container: {}", e)))?;

        let part = archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| fail(format!("{} missing: {}", DOCUMENT_PART, e)))?;

        if part.size() > self.max_part_bytes {
            return Err(fail(format!(
                "{} is {} bytes, limit is {}",
                DOCUMENT_PART,
                part.size(),
                self.max_part_bytes
            )));
        }

        let mut xml = Vec::with_capacity(part.size() as usize);
        part.take(self.max_part_bytes)
            .read_to_end(&mut xml)
            .map_err(|e| fail(format!("failed to read {}: {}", DOCUMENT_PART, e)))?;
        Ok(xml)
    }
}

impl TextExtractor for WordExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Word
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let xml = self.read_document_part(data)?;
        document_xml_to_text(&xml)
    }
}

fn fail(message: String) -> ExtractionError {
    ExtractionError::failed(DocumentKind::Word, message)
}

/// Convert the WordprocessingML body into raw text.
fn document_xml_to_text(xml: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text_run = false;
    // open elements inside a skipped subtree
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                if skip_depth > 0 || SKIPPED_ELEMENTS.contains(&name.as_ref()) {
                    skip_depth += 1;
                } else if name.as_ref() == b"w:t" {
                    in_text_run = true;
                }
            }
            Ok(Event::Empty(_)) if skip_depth > 0 => {}
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run && skip_depth == 0 => {
                let text = e
                    .unescape()
                    .map_err(|e| fail(format!("bad text run: {}", e)))?;
                out.push_str(&text);
            }
            Ok(Event::End(_)) if skip_depth > 0 => skip_depth -= 1,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push_str("\n\n"),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(fail(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
        buf.clear();
    }

    Ok(out)
}
