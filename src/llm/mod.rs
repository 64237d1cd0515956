//! Language model client abstraction and the Gemini HTTP adapter.
//!
//! The pipeline only needs one operation: turn a prompt into generated text.
//! Keeping it behind [`LanguageModel`] lets tests substitute a stub and lets
//! integration tests point the real client at a mock HTTP server.

use crate::config::get_config;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by language model providers.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connection refused, timeout, malformed body).
    #[error("Model request failed: {0}")]
    Request(String),
    /// The provider returned a non-success status code.
    #[error("Model API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error detail extracted from the response body, when present.
        message: String,
    },
    /// The provider answered successfully but returned no generated text.
    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

/// Interface implemented by text generation backends.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate text for the supplied prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl GeminiClient {
    /// Construct a client with explicit connection parameters.
    ///
    /// The timeout is mandatory: a hung model call must surface as an error
    /// instead of stalling the request indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .user_agent("paperlens/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Construct a client from the loaded application configuration.
    pub fn from_config() -> Result<Self, LlmError> {
        let config = get_config();
        Self::new(
            config.gemini_base_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            Duration::from_secs(config.gemini_timeout_secs),
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| "no error detail provided".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text: String = payload
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}
