//! In-memory registry of per-document sessions.
//!
//! A job lives for the lifetime of the process: there is no TTL and no
//! persistence, so a restart invalidates every issued id. Callers must treat
//! a missing job as an expired session, not a fault.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Session created by the summarize flow: summary, stored text, and the
/// overlapping chunks computed at upload time.
#[derive(Debug, Clone)]
pub struct SummaryJob {
    /// Normalized model-generated summary.
    pub summary: String,
    /// Extracted (possibly truncated) document text.
    pub full_text: String,
    /// Overlapping windows over `full_text`, in document order.
    pub chunks: Vec<String>,
    /// Number of questions asked against this session (tracked, unenforced).
    pub questions_asked: u32,
}

/// Session created by the ask-about flow: raw text plus a bounded counter.
#[derive(Debug, Clone)]
pub struct FullTextJob {
    /// Extracted (possibly truncated) document text.
    pub full_text: String,
    /// Number of questions asked against this session.
    pub questions_asked: u32,
}

/// Outcome of attempting to reserve a question slot on a full-text job.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReserveError {
    /// The job id is unknown (never issued, or lost to a restart).
    #[error("job not found")]
    Absent,
    /// The job has already consumed its question quota.
    #[error("question quota exhausted")]
    QuotaExceeded,
}

/// Process-wide associative state for in-flight document sessions.
///
/// Constructed explicitly and shared through an `Arc` so tests get a fresh
/// store per case. Both maps sit behind one mutex; every operation is a short
/// critical section with no await points, so quota updates cannot interleave.
#[derive(Default)]
pub struct JobStore {
    inner: Mutex<Jobs>,
}

#[derive(Default)]
struct Jobs {
    summary: HashMap<String, SummaryJob>,
    full_text: HashMap<String, FullTextJob>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a summarize-flow session and return its fresh id.
    pub fn create_summary_job(
        &self,
        summary: String,
        full_text: String,
        chunks: Vec<String>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        let mut jobs = self.lock();
        jobs.summary.insert(
            id.clone(),
            SummaryJob {
                summary,
                full_text,
                chunks,
                questions_asked: 0,
            },
        );
        id
    }

    /// Register an ask-about session and return its fresh id.
    pub fn create_full_text_job(&self, full_text: String) -> String {
        let id = Uuid::new_v4().to_string();
        let mut jobs = self.lock();
        jobs.full_text.insert(
            id.clone(),
            FullTextJob {
                full_text,
                questions_asked: 0,
            },
        );
        id
    }

    /// Look up a summarize-flow session. `None` means the session expired.
    pub fn get_summary_job(&self, id: &str) -> Option<SummaryJob> {
        self.lock().summary.get(id).cloned()
    }

    /// Look up an ask-about session. `None` means the session expired.
    pub fn get_full_text_job(&self, id: &str) -> Option<FullTextJob> {
        self.lock().full_text.get(id).cloned()
    }

    /// Increment the question counter on either kind of job and return the
    /// new value. Returns 0 without creating anything when the id is unknown.
    pub fn increment_question_count(&self, id: &str) -> u32 {
        let mut jobs = self.lock();
        if let Some(job) = jobs.summary.get_mut(id) {
            job.questions_asked += 1;
            return job.questions_asked;
        }
        if let Some(job) = jobs.full_text.get_mut(id) {
            job.questions_asked += 1;
            return job.questions_asked;
        }
        0
    }

    /// Atomically check the quota on a full-text job and claim one question
    /// slot, returning the post-increment count.
    ///
    /// The check and the increment happen under one lock acquisition, so two
    /// concurrent questions on the same job can never both pass a
    /// `quota - 1` check.
    pub fn reserve_question(&self, id: &str, quota: u32) -> Result<u32, ReserveError> {
        let mut jobs = self.lock();
        let job = jobs.full_text.get_mut(id).ok_or(ReserveError::Absent)?;
        if job.questions_asked >= quota {
            return Err(ReserveError::QuotaExceeded);
        }
        job.questions_asked += 1;
        Ok(job.questions_asked)
    }

    /// Refund a previously reserved question slot (model call failed).
    pub fn release_question(&self, id: &str) {
        let mut jobs = self.lock();
        if let Some(job) = jobs.full_text.get_mut(id) {
            job.questions_asked = job.questions_asked.saturating_sub(1);
        }
    }

    /// Remove a summarize-flow session. Idempotent.
    pub fn delete_summary_job(&self, id: &str) {
        self.lock().summary.remove(id);
    }

    /// Remove an ask-about session. Idempotent.
    pub fn delete_full_text_job(&self, id: &str) {
        self.lock().full_text.remove(id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Jobs> {
        // Poisoning only happens if a panic occurred inside a critical
        // section; the store holds plain data, so continuing is safe.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
