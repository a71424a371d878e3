//! PDF résumé extraction. Compiled in through the default `pdf` cargo
//! feature; a build without it keeps the endpoint but reports the feature
//! as unavailable instead of failing the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF extraction is not available in this build")]
    Unavailable,
    #[error("could not read PDF: {0}")]
    Extraction(String),
    #[error("the PDF contains no extractable text")]
    Empty,
}

pub fn is_available() -> bool {
    cfg!(feature = "pdf")
}

#[cfg(feature = "pdf")]
pub fn extract_text(data: &[u8]) -> Result<String, PdfError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;
    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(PdfError::Empty);
    }
    Ok(text)
}

#[cfg(not(feature = "pdf"))]
pub fn extract_text(_data: &[u8]) -> Result<String, PdfError> {
    Err(PdfError::Unavailable)
}

#[cfg(all(test, feature = "pdf"))]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_rejected_not_panicked() {
        let result = extract_text(b"this is not a pdf at all");
        assert!(matches!(result, Err(PdfError::Extraction(_))));
    }
}
