//! Session orchestrator coordinating extraction, chunking, summarization,
//! and the two question-answering flows.

use crate::{
    citations::{ArxivClient, CitationError},
    extract::{TextExtractor, get_text_extractor},
    jobs::{JobStore, ReserveError},
    llm::{GeminiClient, LanguageModel},
    metrics::{MetricsSnapshot, RequestMetrics},
    processing::{
        chunking::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, chunk_text},
        normalize::{
            STORAGE_TRUNCATION_MARKER, SUMMARY_TRUNCATION_MARKER, normalize_math_fences,
            truncate_with_marker,
        },
        prompts,
        types::{
            FullTextAnswerOutcome, FullTextUploadOutcome, PaperUpload, QaError,
            SummaryUploadOutcome, UploadError,
        },
    },
};
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum accepted upload size; the boundary itself is accepted.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Hard cap on stored extracted text.
pub const MAX_STORED_TEXT: usize = 500_000;
/// Hard cap on text handed to the summarizer.
pub const MAX_SUMMARY_INPUT: usize = 300_000;
/// Question-answer turns permitted per full-text job.
pub const QUESTION_QUOTA: u32 = 5;

/// Coordinates the full document lifecycle: upload validation, extraction,
/// chunking, summarization, session registration, and Q&A turns.
///
/// The service owns the extractor, the model client, the job store, and the
/// metrics registry. Construct it once near process start and share it
/// through an `Arc`; each test builds its own with stub collaborators.
pub struct PaperService {
    extractor: Arc<dyn TextExtractor>,
    model: Box<dyn LanguageModel>,
    arxiv: ArxivClient,
    jobs: JobStore,
    metrics: RequestMetrics,
}

/// Abstraction over the paper pipeline used by the HTTP surface.
#[async_trait]
pub trait PaperApi: Send + Sync {
    /// Validate, extract, chunk, summarize, and register a summary session.
    async fn upload_and_summarize(
        &self,
        upload: PaperUpload,
    ) -> Result<SummaryUploadOutcome, UploadError>;

    /// Validate, extract, and register a full-text session (no summary).
    async fn upload_full_text(
        &self,
        upload: PaperUpload,
    ) -> Result<FullTextUploadOutcome, UploadError>;

    /// Answer a question grounded in a stored summary session.
    async fn answer_about_summary(&self, job_id: &str, question: &str)
    -> Result<String, QaError>;

    /// Answer a quota-bounded question against a full-text session.
    async fn answer_about_full_text(
        &self,
        job_id: &str,
        question: &str,
    ) -> Result<FullTextAnswerOutcome, QaError>;

    /// Format a citation for an arXiv URL in the requested style.
    async fn generate_citation(
        &self,
        arxiv_url: &str,
        style: &str,
    ) -> Result<String, CitationError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl PaperService {
    /// Build the production service from the loaded configuration.
    pub fn new() -> Self {
        let model = GeminiClient::from_config().expect("Failed to build Gemini client");
        let arxiv = ArxivClient::from_config().expect("Failed to build arXiv client");
        Self::with_components(get_text_extractor(), Box::new(model), arxiv)
    }

    /// Build a service with explicit collaborators (used by tests).
    pub fn with_components(
        extractor: Arc<dyn TextExtractor>,
        model: Box<dyn LanguageModel>,
        arxiv: ArxivClient,
    ) -> Self {
        Self {
            extractor,
            model,
            arxiv,
            jobs: JobStore::new(),
            metrics: RequestMetrics::new(),
        }
    }

    /// Direct access to the job store (used by tests to observe sessions).
    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    fn validate(upload: &PaperUpload) -> Result<(), UploadError> {
        let is_pdf = upload
            .content_type
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case("application/pdf"));
        if !is_pdf {
            return Err(UploadError::InvalidInput(
                "Only PDF files are supported".into(),
            ));
        }
        if upload.data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::InvalidInput("PDF exceeds 20MB limit".into()));
        }
        if upload.data.is_empty() {
            return Err(UploadError::InvalidInput("No file provided".into()));
        }
        Ok(())
    }

    /// Validate the upload and return the extracted, storage-truncated text.
    async fn extract_text(&self, upload: PaperUpload) -> Result<String, UploadError> {
        Self::validate(&upload)?;
        let file_name = upload.file_name.clone();
        let extractor = Arc::clone(&self.extractor);
        let data = upload.data;
        // PDF parsing is CPU-bound; keep it off the async workers.
        let text = tokio::task::spawn_blocking(move || extractor.extract(&data))
            .await
            .map_err(|err| UploadError::ExtractionFailed(err.to_string()))??;
        tracing::debug!(file = ?file_name, text_len = text.len(), "Extracted document text");
        Ok(truncate_with_marker(
            &text,
            MAX_STORED_TEXT,
            STORAGE_TRUNCATION_MARKER,
        ))
    }

    async fn generate_answer(&self, prompt: String) -> Result<String, QaError> {
        let answer = self.model.generate(&prompt).await?;
        self.metrics.record_question();
        Ok(answer)
    }
}

fn validate_question(question: &str) -> Result<&str, QaError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(QaError::InvalidInput("Question is required".into()));
    }
    Ok(trimmed)
}

#[async_trait]
impl PaperApi for PaperService {
    async fn upload_and_summarize(
        &self,
        upload: PaperUpload,
    ) -> Result<SummaryUploadOutcome, UploadError> {
        let text = self.extract_text(upload).await?;
        let chunks = chunk_text(&text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)?;

        let summary_input =
            truncate_with_marker(&text, MAX_SUMMARY_INPUT, SUMMARY_TRUNCATION_MARKER);
        let summary = self
            .model
            .generate(&prompts::summary_prompt(&summary_input))
            .await?;
        let summary = normalize_math_fences(&summary);

        let chunk_count = chunks.len();
        let job_id = self.jobs.create_summary_job(summary.clone(), text, chunks);
        self.metrics.record_paper();
        tracing::info!(job_id = %job_id, chunks = chunk_count, "Registered summary session");

        Ok(SummaryUploadOutcome { job_id, summary })
    }

    async fn upload_full_text(
        &self,
        upload: PaperUpload,
    ) -> Result<FullTextUploadOutcome, UploadError> {
        let text = self.extract_text(upload).await?;
        let job_id = self.jobs.create_full_text_job(text);
        self.metrics.record_paper();
        tracing::info!(job_id = %job_id, "Registered full-text session");
        Ok(FullTextUploadOutcome { job_id })
    }

    async fn answer_about_summary(
        &self,
        job_id: &str,
        question: &str,
    ) -> Result<String, QaError> {
        let question = validate_question(question)?;
        let job = self
            .jobs
            .get_summary_job(job_id)
            .ok_or(QaError::SummarySessionExpired)?;

        let prompt = prompts::summary_qa_prompt(&job.summary, &job.full_text, question);
        let answer = self.generate_answer(prompt).await?;

        // Usage is tracked for the summary flow but deliberately not capped.
        let asked = self.jobs.increment_question_count(job_id);
        tracing::debug!(job_id = %job_id, asked, "Answered summary-grounded question");
        Ok(answer)
    }

    async fn answer_about_full_text(
        &self,
        job_id: &str,
        question: &str,
    ) -> Result<FullTextAnswerOutcome, QaError> {
        let question = validate_question(question)?;
        let job = self
            .jobs
            .get_full_text_job(job_id)
            .ok_or(QaError::FullTextSessionExpired)?;

        let asked = self
            .jobs
            .reserve_question(job_id, QUESTION_QUOTA)
            .map_err(|err| match err {
                ReserveError::Absent => QaError::FullTextSessionExpired,
                ReserveError::QuotaExceeded => QaError::QuotaExceeded {
                    quota: QUESTION_QUOTA,
                },
            })?;

        let prompt = prompts::full_text_qa_prompt(&job.full_text, question);
        let answer = match self.generate_answer(prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                // The slot was reserved before the call; refund it so a
                // transient model failure does not burn quota.
                self.jobs.release_question(job_id);
                return Err(err);
            }
        };

        let questions_remaining = QUESTION_QUOTA - asked;
        tracing::debug!(job_id = %job_id, questions_remaining, "Answered full-text question");
        Ok(FullTextAnswerOutcome {
            answer,
            questions_remaining,
        })
    }

    async fn generate_citation(
        &self,
        arxiv_url: &str,
        style: &str,
    ) -> Result<String, CitationError> {
        let citation = self.arxiv.generate(arxiv_url, style).await?;
        self.metrics.record_citation();
        Ok(citation)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
