//! Core data types and error definitions for the processing pipeline.

use crate::extract::ExtractError;
use crate::llm::LlmError;
use thiserror::Error;

/// Errors produced while turning raw text into overlapping chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// The caller configured an impossible window size.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the upload-and-summarize and upload-full-text flows.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request itself is malformed: wrong content type, oversize file,
    /// missing field. Client-recoverable; no retry needed server-side.
    #[error("{0}")]
    InvalidInput(String),
    /// The extractor produced no usable text for the document.
    #[error("Failed to extract text from PDF: {0}")]
    ExtractionFailed(String),
    /// The summarization model call failed (timeout, quota, bad response).
    #[error("Failed to generate summary: {0}")]
    SummarizationFailed(#[from] LlmError),
    /// Chunking failed to segment the document. Unreachable with the
    /// pipeline's fixed window parameters, but propagated rather than hidden.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
}

impl From<ExtractError> for UploadError {
    fn from(err: ExtractError) -> Self {
        Self::ExtractionFailed(err.to_string())
    }
}

/// Errors emitted by the two question-answering flows.
#[derive(Debug, Error)]
pub enum QaError {
    /// Missing or empty question.
    #[error("{0}")]
    InvalidInput(String),
    /// A summary-flow job id is unknown: never issued, or wiped by a restart.
    /// Expected terminal condition; the client must re-upload.
    #[error(
        "Session expired. The document was processed but the session is no longer available. \
         Please upload the document again."
    )]
    SummarySessionExpired,
    /// A full-text-flow job id is unknown. Same condition as
    /// [`Self::SummarySessionExpired`]; the ask-about flow uses a shorter
    /// client-facing message.
    #[error("Session expired. Please upload the document again.")]
    FullTextSessionExpired,
    /// The job already consumed its question quota. No model call was made.
    #[error("Question limit reached. Maximum {quota} questions per document.")]
    QuotaExceeded {
        /// The configured per-job quota.
        quota: u32,
    },
    /// The answer model call failed.
    #[error("Failed to get answer: {0}")]
    AnswerFailed(#[from] LlmError),
}

/// A document received by an upload endpoint, already read into memory.
#[derive(Debug, Clone)]
pub struct PaperUpload {
    /// Client-declared content type, when present.
    pub content_type: Option<String>,
    /// Original file name, for logging only.
    pub file_name: Option<String>,
    /// Raw document bytes.
    pub data: Vec<u8>,
}

/// Result of the upload-and-summarize flow.
#[derive(Debug, Clone)]
pub struct SummaryUploadOutcome {
    /// Opaque session identifier for follow-up questions.
    pub job_id: String,
    /// Normalized structured summary of the document.
    pub summary: String,
}

/// Result of the upload-full-text flow.
#[derive(Debug, Clone)]
pub struct FullTextUploadOutcome {
    /// Opaque session identifier for follow-up questions.
    pub job_id: String,
}

/// Result of a quota-bounded full-text question.
#[derive(Debug, Clone)]
pub struct FullTextAnswerOutcome {
    /// Generated answer text.
    pub answer: String,
    /// Question slots left on this job after the call.
    pub questions_remaining: u32,
}
