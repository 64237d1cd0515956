//! HTTP surface for paperlens.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /api/papers/upload` – Upload a PDF, extract and chunk its text, and return a
//!   structured summary plus a session id for follow-up questions.
//! - `POST /api/papers/:job_id/qa` – Ask a question grounded in a summary session.
//! - `POST /api/ask-about/upload` – Upload a PDF for quota-bounded full-text Q&A.
//! - `POST /api/ask-about/:job_id/qa` – Ask a question against a full-text session
//!   (at most five per document).
//! - `POST /api/citations` – Format an arXiv citation in APA/MLA/Chicago/IEEE style.
//! - `GET /api/health` – Static status payload.
//! - `GET /metrics` – Observe request counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! All failures surface as `{ "detail": "<message>" }` with a status code from the
//! domain error taxonomy; a lost session is a 404 the client recovers from by
//! re-uploading, never an internal error.

use crate::citations::CitationError;
use crate::processing::{MAX_UPLOAD_BYTES, PaperApi, PaperUpload, QaError, UploadError};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router exposing the paper API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: PaperApi + 'static,
{
    Router::new()
        .route("/api/papers/upload", post(upload_paper::<S>))
        .route("/api/papers/:job_id/qa", post(summary_qa::<S>))
        .route("/api/ask-about/upload", post(upload_full_text::<S>))
        .route("/api/ask-about/:job_id/qa", post(full_text_qa::<S>))
        .route("/api/citations", post(create_citation::<S>))
        .route("/api/health", get(health))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(service)
}

/// Success response for `POST /api/papers/upload`.
#[derive(Serialize)]
struct SummaryUploadResponse {
    /// Session identifier to use for follow-up questions.
    job_id: String,
    /// Structured summary of the uploaded document.
    summary: String,
}

/// Success response for `POST /api/ask-about/upload`.
#[derive(Serialize)]
struct FullTextUploadResponse {
    job_id: String,
    message: &'static str,
}

/// Request body for both question endpoints.
#[derive(Deserialize)]
struct QuestionRequest {
    /// The question to answer; required and non-empty.
    #[serde(default)]
    question: Option<String>,
}

/// Success response for `POST /api/papers/:job_id/qa`.
#[derive(Serialize)]
struct AnswerResponse {
    answer: String,
}

/// Success response for `POST /api/ask-about/:job_id/qa`.
#[derive(Serialize)]
struct FullTextAnswerResponse {
    answer: String,
    questions_remaining: u32,
}

/// Request body for `POST /api/citations`.
#[derive(Deserialize)]
struct CitationRequest {
    #[serde(default)]
    arxiv_url: Option<String>,
    #[serde(default)]
    style: Option<String>,
}

/// Success response for `POST /api/citations`.
#[derive(Serialize)]
struct CitationResponse {
    citation: String,
}

/// Pull the uploaded document out of a multipart request.
async fn read_upload(mut multipart: Multipart) -> Result<PaperUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(err.to_string()))?;
        return Ok(PaperUpload {
            content_type,
            file_name,
            data: data.to_vec(),
        });
    }
    Err(AppError::bad_request("No file provided"))
}

/// Upload a PDF and create a summary-backed Q&A session.
async fn upload_paper<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<SummaryUploadResponse>, AppError>
where
    S: PaperApi,
{
    let upload = read_upload(multipart).await?;
    let outcome = service.upload_and_summarize(upload).await?;
    tracing::info!(job_id = %outcome.job_id, "Upload summarized");
    Ok(Json(SummaryUploadResponse {
        job_id: outcome.job_id,
        summary: outcome.summary,
    }))
}

/// Upload a PDF and create a full-text Q&A session.
async fn upload_full_text<S>(
    State(service): State<Arc<S>>,
    multipart: Multipart,
) -> Result<Json<FullTextUploadResponse>, AppError>
where
    S: PaperApi,
{
    let upload = read_upload(multipart).await?;
    let outcome = service.upload_full_text(upload).await?;
    tracing::info!(job_id = %outcome.job_id, "Full-text session created");
    Ok(Json(FullTextUploadResponse {
        job_id: outcome.job_id,
        message: "Document uploaded successfully. You can now ask questions about it.",
    }))
}

/// Answer a question grounded in a summary session.
async fn summary_qa<S>(
    State(service): State<Arc<S>>,
    Path(job_id): Path<String>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, AppError>
where
    S: PaperApi,
{
    let question = request.question.unwrap_or_default();
    let answer = service.answer_about_summary(&job_id, &question).await?;
    Ok(Json(AnswerResponse { answer }))
}

/// Answer a quota-bounded question against a full-text session.
async fn full_text_qa<S>(
    State(service): State<Arc<S>>,
    Path(job_id): Path<String>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<FullTextAnswerResponse>, AppError>
where
    S: PaperApi,
{
    let question = request.question.unwrap_or_default();
    let outcome = service.answer_about_full_text(&job_id, &question).await?;
    Ok(Json(FullTextAnswerResponse {
        answer: outcome.answer,
        questions_remaining: outcome.questions_remaining,
    }))
}

/// Format a citation for an arXiv URL.
async fn create_citation<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<CitationRequest>,
) -> Result<Json<CitationResponse>, AppError>
where
    S: PaperApi,
{
    let Some(arxiv_url) = request.arxiv_url.filter(|url| !url.trim().is_empty()) else {
        return Err(AppError::bad_request("arxiv_url is required"));
    };
    let Some(style) = request.style.filter(|style| !style.trim().is_empty()) else {
        return Err(AppError::bad_request(
            "style is required (APA, MLA, Chicago, or IEEE)",
        ));
    };
    let citation = service.generate_citation(&arxiv_url, &style).await?;
    Ok(Json(CitationResponse { citation }))
}

/// Static health payload.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "paperlens API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Return a concise request-counters snapshot.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<crate::metrics::MetricsSnapshot>
where
    S: PaperApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "upload_paper",
                method: "POST",
                path: "/api/papers/upload",
                description: "Upload a PDF (multipart field `file`, <= 20 MiB) and receive { \"job_id\": string, \"summary\": string }.",
                request_example: None,
            },
            CommandDescriptor {
                name: "paper_qa",
                method: "POST",
                path: "/api/papers/:job_id/qa",
                description: "Ask a question grounded in the stored summary and text. Response returns { \"answer\": string }.",
                request_example: Some(json!({ "question": "What is the main contribution?" })),
            },
            CommandDescriptor {
                name: "ask_about_upload",
                method: "POST",
                path: "/api/ask-about/upload",
                description: "Upload a PDF for full-text Q&A (no summary, five questions per document).",
                request_example: None,
            },
            CommandDescriptor {
                name: "ask_about_qa",
                method: "POST",
                path: "/api/ask-about/:job_id/qa",
                description: "Ask a question against the stored full text. Response returns { \"answer\": string, \"questions_remaining\": number }.",
                request_example: Some(json!({ "question": "Which datasets were used?" })),
            },
            CommandDescriptor {
                name: "citation",
                method: "POST",
                path: "/api/citations",
                description: "Format an arXiv citation. Styles: APA, MLA, Chicago, IEEE.",
                request_example: Some(json!({
                    "arxiv_url": "https://arxiv.org/abs/2301.07041",
                    "style": "APA"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return request counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

/// Error wrapper translating the domain taxonomy into HTTP responses.
struct AppError {
    status: StatusCode,
    detail: String,
    /// Set on quota rejections so clients can render the exhausted counter.
    questions_remaining: Option<u32>,
}

impl AppError {
    fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
            questions_remaining: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut body = json!({ "detail": self.detail });
        if let Some(remaining) = self.questions_remaining {
            body["questions_remaining"] = json!(remaining);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let status = match &err {
            UploadError::InvalidInput(_) | UploadError::ExtractionFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            UploadError::SummarizationFailed(_) => StatusCode::BAD_GATEWAY,
            UploadError::Chunking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            detail: err.to_string(),
            questions_remaining: None,
        }
    }
}

impl From<QaError> for AppError {
    fn from(err: QaError) -> Self {
        let (status, questions_remaining) = match &err {
            QaError::InvalidInput(_) => (StatusCode::BAD_REQUEST, None),
            QaError::SummarySessionExpired | QaError::FullTextSessionExpired => {
                (StatusCode::NOT_FOUND, None)
            }
            QaError::QuotaExceeded { .. } => (StatusCode::BAD_REQUEST, Some(0)),
            QaError::AnswerFailed(_) => (StatusCode::BAD_GATEWAY, None),
        };
        Self {
            status,
            detail: err.to_string(),
            questions_remaining,
        }
    }
}

impl From<CitationError> for AppError {
    fn from(err: CitationError) -> Self {
        let status = match &err {
            CitationError::InvalidUrl
            | CitationError::UnknownStyle(_)
            | CitationError::Metadata => StatusCode::BAD_REQUEST,
            CitationError::Fetch(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            detail: err.to_string(),
            questions_remaining: None,
        }
    }
}
