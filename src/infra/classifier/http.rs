//! HTTP classifier backend.

use async_trait::async_trait;

use crate::core::{Classifier, ScoringRequest, SchedulerError};

/// Submits scoring requests as JSON to a remote classification service.
/// Scores arrive later through the host's inbound event channel.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpClassifier {
    /// Create a client for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn submit(&self, request: ScoringRequest) -> Result<(), SchedulerError> {
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SchedulerError::Classifier(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SchedulerError::Classifier(format!(
                "classifier returned {status}"
            )));
        }
        Ok(())
    }
}
