//! In-memory classifier backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{Classifier, ClassifierCallback, ScoredPhrase, ScoringRequest, SchedulerError};

/// Records scoring requests so a host or test can answer them later.
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingClassifier {
    requests: Arc<Mutex<Vec<ScoringRequest>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingClassifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent submissions fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// All submitted requests, oldest first.
    pub fn requests(&self) -> Vec<ScoringRequest> {
        self.requests.lock().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<ScoringRequest> {
        self.requests.lock().last().cloned()
    }

    /// Build the callback for the most recent request, scoring each phrase
    /// with `score`.
    pub fn answer_last<F>(&self, score: F) -> Option<ClassifierCallback>
    where
        F: Fn(&str) -> Vec<f64>,
    {
        let request = self.last_request()?;
        Some(ClassifierCallback {
            key: request.key,
            phrases: request
                .phrases
                .into_iter()
                .map(|text| ScoredPhrase {
                    scores: score(&text),
                    text,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl Classifier for RecordingClassifier {
    async fn submit(&self, request: ScoringRequest) -> Result<(), SchedulerError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(SchedulerError::Classifier("classifier unavailable".into()));
        }
        tracing::debug!(key = %request.key, phrases = request.phrases.len(), "scoring request recorded");
        self.requests.lock().push(request);
        Ok(())
    }
}
