//! Resume text extraction. PDF parsing is delegated to `pdf-extract`.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF parser panicked: {0}")]
    Panicked(String),
}

/// Turns an uploaded document into plain text.
/// Carried in `AppState` as `Arc<dyn TextExtractor>`.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, document: &[u8]) -> Result<String, ExtractionError>;
}

/// Extracts the text of every page of an in-memory PDF.
/// Pages without extractable text contribute nothing.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, document: &[u8]) -> Result<String, ExtractionError> {
        let bytes = document.to_vec();

        // pdf-extract is CPU-bound and may panic on malformed input; keep it off the runtime.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractionError::Panicked(e.to_string()))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        debug!(chars = text.len(), "Extracted resume text");
        Ok(text)
    }
}
