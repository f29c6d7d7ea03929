//! Text extraction command.

use std::path::Path;

use console::style;

use crate::config::Config;
use crate::extract::{ExtractedText, ExtractorRegistry};
use crate::upload::UploadedFile;

/// Validate and extract a local document, the same way an upload is handled.
pub(super) async fn load_document(config: &Config, path: &Path) -> anyhow::Result<ExtractedText> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let upload = UploadedFile::from_path(path)?;
    let kind = upload.validate(config.server.max_upload_bytes)?;
    tracing::debug!(
        "Extracting {} ({}, {} bytes)",
        upload.name,
        kind,
        upload.size()
    );

    let extracted = tokio::task::spawn_blocking(move || {
        ExtractorRegistry::new().extract_kind(kind, &upload.content)
    })
    .await??;
    Ok(extracted)
}

/// Print the text of a document.
pub async fn cmd_extract(config: &Config, path: &Path) -> anyhow::Result<()> {
    let extracted = load_document(config, path).await?;

    eprintln!(
        "{} Extracted {} characters from {} ({})",
        style("✓").green(),
        extracted.text.chars().count(),
        path.display(),
        extracted.kind
    );
    println!("{}", extracted.text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionError;
    use crate::upload::UploadError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_plain_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bill.txt");
        std::fs::write(&path, "An Act\r\n\r\n\r\n\r\nSection 1").unwrap();

        let extracted = load_document(&Config::default(), &path).await.unwrap();
        assert_eq!(extracted.text, "An Act\n\nSection 1");
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let err = load_document(&Config::default(), &path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UploadError>(),
            Some(UploadError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_oversized_before_parsing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 2048]).unwrap();

        let mut config = Config::default();
        config.server.max_upload_bytes = 1024;
        let err = load_document(&config, &path).await.unwrap_err();
        assert_eq!(err.to_string(), "File size must be less than 1KB");
    }

    #[tokio::test]
    async fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "\n\n").unwrap();

        let err = load_document(&Config::default(), &path).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExtractionError>(),
            Some(ExtractionError::NoText)
        ));
    }
}
