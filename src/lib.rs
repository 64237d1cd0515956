#![deny(missing_docs)]

//! Core library for the paperlens paper summarization and Q&A server.

/// HTTP routing and REST handlers.
pub mod api;
/// arXiv citation lookup and formatting.
pub mod citations;
/// Environment-driven configuration management.
pub mod config;
/// PDF text extraction abstraction.
pub mod extract;
/// In-memory session registry for uploaded documents.
pub mod jobs;
/// Language model client abstraction and the Gemini adapter.
pub mod llm;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters for observability.
pub mod metrics;
/// Document processing pipeline and session orchestration.
pub mod processing;
