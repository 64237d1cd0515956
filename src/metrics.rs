use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing request activity.
#[derive(Default)]
pub struct RequestMetrics {
    papers_processed: AtomicU64,
    questions_answered: AtomicU64,
    citations_generated: AtomicU64,
}

impl RequestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed upload.
    pub fn record_paper(&self) {
        self.papers_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully answered question.
    pub fn record_question(&self) {
        self.questions_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successfully formatted citation.
    pub fn record_citation(&self) {
        self.citations_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            papers_processed: self.papers_processed.load(Ordering::Relaxed),
            questions_answered: self.questions_answered.load(Ordering::Relaxed),
            citations_generated: self.citations_generated.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of request counters used for reporting.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of uploads fully processed since startup.
    pub papers_processed: u64,
    /// Number of question-answer turns completed since startup.
    pub questions_answered: u64,
    /// Number of citations formatted since startup.
    pub citations_generated: u64,
}
