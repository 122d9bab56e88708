//! Document text extraction.
//!
//! Three strategies, chosen from the declared MIME type or file extension:
//! - PDF: page-by-page text-layer extraction (no OCR; image-only pages
//!   contribute nothing rather than failing the upload)
//! - plain text: verbatim UTF-8 decode
//! - everything else: best-effort UTF-8 decode, failure marks the one
//!   document as unextracted without aborting the batch

pub mod orchestrator;
pub mod pdf;
pub mod text;

pub use orchestrator::*;
pub use pdf::*;
pub use text::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text encoding error: {0}")]
    Encoding(String),
}

/// Extraction strategy resolved from a file's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    PlainText,
    /// Office documents, spreadsheets, images: generic decode attempt only.
    Other,
}

impl FileKind {
    /// Classify from a declared MIME type, falling back to the file-name
    /// extension when the type is missing or unhelpful.
    pub fn detect(name: &str, declared_mime: &str) -> Self {
        let mime = if declared_mime.trim().is_empty() {
            mime_guess::from_path(name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string()
        } else {
            declared_mime.trim().to_ascii_lowercase()
        };

        if mime == "application/pdf" {
            Self::Pdf
        } else if mime.starts_with("text/")
            || mime == "application/json"
            || mime == "application/csv"
        {
            Self::PlainText
        } else {
            Self::Other
        }
    }
}
