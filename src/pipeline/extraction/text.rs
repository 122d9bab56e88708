use super::ExtractionError;

/// Decode a plain-text file verbatim.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Encoding(e.to_string()))
}

/// Best-effort decode for declared types we have no dedicated parser for
/// (office documents, spreadsheets, images). Binary content fails here and
/// the caller records the document as unextracted.
pub fn extract_generic(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| ExtractionError::Encoding(format!("not decodable as text: {e}")))
}
