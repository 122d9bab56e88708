use crate::models::DocumentAttachment;

use super::pdf::extract_pdf_text;
use super::text::{extract_generic, extract_plain_text};
use super::{ExtractionError, FileKind};

/// An uploaded file awaiting extraction.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub declared_mime: String,
    pub bytes: Vec<u8>,
}

/// Extract text from one file according to its declared type.
pub fn extract_file(file: &UploadedFile) -> Result<String, ExtractionError> {
    match FileKind::detect(&file.name, &file.declared_mime) {
        FileKind::Pdf => extract_pdf_text(&file.bytes),
        FileKind::PlainText => extract_plain_text(&file.bytes),
        FileKind::Other => extract_generic(&file.bytes),
    }
}

/// Extract a batch of uploads in upload order, one at a time.
///
/// Failures are isolated per file: a document that cannot be extracted
/// keeps its attachment entry with `extracted_text: None` and the rest of
/// the batch proceeds.
pub fn extract_batch(files: &[UploadedFile]) -> Vec<DocumentAttachment> {
    files
        .iter()
        .map(|file| {
            let extracted_text = match extract_file(file) {
                Ok(text) => {
                    tracing::debug!(
                        file = %file.name,
                        chars = text.len(),
                        "document text extracted"
                    );
                    Some(text)
                }
                Err(e) => {
                    tracing::warn!(
                        file = %file.name,
                        error = %e,
                        "extraction failed, skipping this document's content"
                    );
                    None
                }
            };
            DocumentAttachment {
                name: file.name.clone(),
                size: file.bytes.len() as u64,
                mime_type: file.declared_mime.clone(),
                extracted_text,
            }
        })
        .collect()
}
