//! Document ingestion — turns an uploaded CV file into plain text.
//!
//! Supported formats: plain text (taken as UTF-8, lossily), PDF
//! (`pdf-extract`), and DOCX (`ingest::docx`). Format detection prefers the
//! filename extension and falls back to the declared content type.

pub mod docx;
pub mod handlers;

use tracing::info;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    PlainText,
    Pdf,
    Docx,
}

/// Detects the format from the filename extension, then the content type.
/// Anything unrecognized is treated as plain text.
pub fn detect_format(filename: &str, content_type: Option<&str>) -> SourceFormat {
    let ext = filename.rsplit('.').next().map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => return SourceFormat::Pdf,
        Some("docx") => return SourceFormat::Docx,
        Some("txt") | Some("md") | Some("text") => return SourceFormat::PlainText,
        _ => {}
    }
    match content_type {
        Some("application/pdf") => SourceFormat::Pdf,
        Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
            SourceFormat::Docx
        }
        _ => SourceFormat::PlainText,
    }
}

/// Extracts the text content of an uploaded document.
pub fn extract_text(format: SourceFormat, bytes: &[u8]) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty.".to_string()));
    }
    let text = match format {
        SourceFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
        SourceFormat::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            AppError::Validation(format!(
                "Could not read the PDF file. It may be corrupt or image-only: {e}"
            ))
        })?,
        SourceFormat::Docx => docx::extract_text(bytes)?,
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the file.".to_string(),
        ));
    }
    info!("Extracted {} chars ({format:?})", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect_format("cv.pdf", None), SourceFormat::Pdf);
        assert_eq!(detect_format("CV.DOCX", None), SourceFormat::Docx);
        assert_eq!(detect_format("notes.txt", None), SourceFormat::PlainText);
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            detect_format("resume", Some("application/pdf")),
            SourceFormat::Pdf
        );
        assert_eq!(
            detect_format(
                "resume",
                Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            ),
            SourceFormat::Docx
        );
        assert_eq!(detect_format("resume", None), SourceFormat::PlainText);
    }

    #[test]
    fn test_extension_wins_over_content_type() {
        assert_eq!(
            detect_format("cv.pdf", Some("application/octet-stream")),
            SourceFormat::Pdf
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        let text = extract_text(SourceFormat::PlainText, b"Jane Doe\nEngineer").unwrap();
        assert_eq!(text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_empty_file_rejected() {
        let result = extract_text(SourceFormat::PlainText, b"");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_whitespace_only_file_rejected() {
        let result = extract_text(SourceFormat::PlainText, b"   \n  \t ");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_a_validation_error() {
        let result = extract_text(SourceFormat::Pdf, b"not a pdf at all");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
