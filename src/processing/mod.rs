//! Document processing pipeline: extraction, chunking, summarization, and
//! session orchestration.

pub mod chunking;
pub mod normalize;
pub mod prompts;
mod service;
pub mod types;

pub use service::{
    MAX_STORED_TEXT, MAX_SUMMARY_INPUT, MAX_UPLOAD_BYTES, PaperApi, PaperService, QUESTION_QUOTA,
};
pub use types::{
    ChunkingError, FullTextAnswerOutcome, FullTextUploadOutcome, PaperUpload, QaError,
    SummaryUploadOutcome, UploadError,
};
