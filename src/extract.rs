//! PDF text extraction behind a narrow trait so the pipeline can be exercised
//! without real PDF bytes in tests.

use thiserror::Error;

/// Errors raised while extracting text from an uploaded document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The PDF parser rejected the document (corrupted, encrypted, ...).
    #[error("Failed to extract text from PDF: {0}")]
    Parse(String),
    /// Parsing succeeded but produced no usable text (e.g. scanned pages).
    #[error("The PDF contains no extractable text")]
    EmptyDocument,
}

/// Interface implemented by document text extractors.
///
/// Extraction is CPU-bound and synchronous; callers are expected to run it on
/// a blocking thread when invoked from async context.
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of a document from its raw bytes.
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError>;
}

/// Extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Construct a new PDF extractor instance.
    pub const fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|err| ExtractError::Parse(err.to_string()))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ExtractError::EmptyDocument);
        }
        Ok(trimmed.to_string())
    }
}

/// Build the extractor used by the production service.
pub fn get_text_extractor() -> std::sync::Arc<dyn TextExtractor> {
    std::sync::Arc::new(PdfTextExtractor::new())
}
