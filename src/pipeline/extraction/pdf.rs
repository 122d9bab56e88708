use super::ExtractionError;

/// Extract the text layer of a PDF, page by page, joined with a blank line
/// between pages.
///
/// A structurally valid PDF whose pages carry no text layer (a scan with no
/// OCR) yields an empty or partial string; only unreadable PDF bytes are an
/// error.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    Ok(pages
        .iter()
        .map(|p| p.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n"))
}

/// Number of pages in a PDF. Used for upload metadata.
pub fn pdf_page_count(pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;
    Ok(pages.len())
}
