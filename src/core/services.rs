//! External collaborator traits.
//!
//! The orchestrator never blocks on scoring: [`Classifier::submit`] only
//! hands the request off, and the scores come back later as a separate
//! inbound event carrying the same correlation key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{ScheduledMessage, SchedulerError, ScoredPhrase};

/// Phrases to score, tagged with the key the callback must echo back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRequest {
    /// Correlation key for the asynchronous callback.
    pub key: String,
    /// Priority phrases, de-duplicated, in first-seen order.
    pub phrases: Vec<String>,
}

/// Fire-and-forget submission of scoring requests.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use engagement_scheduler::core::{Classifier, ScoringRequest, SchedulerError};
///
/// struct QueueClassifier { tx: flume::Sender<ScoringRequest> }
///
/// #[async_trait]
/// impl Classifier for QueueClassifier {
///     async fn submit(&self, request: ScoringRequest) -> Result<(), SchedulerError> {
///         self.tx.send(request).map_err(|e| SchedulerError::Classifier(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Submit a request. Success only means the request was accepted.
    async fn submit(&self, request: ScoringRequest) -> Result<(), SchedulerError>;
}

#[async_trait]
impl<T: Classifier + ?Sized> Classifier for Box<T> {
    async fn submit(&self, request: ScoringRequest) -> Result<(), SchedulerError> {
        (**self).submit(request).await
    }
}

/// Receiver of computed schedules.
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Publish scheduled message records.
    async fn publish(&self, messages: &[ScheduledMessage]) -> Result<(), SchedulerError>;
}

#[async_trait]
impl<T: DeliveryService + ?Sized> DeliveryService for Box<T> {
    async fn publish(&self, messages: &[ScheduledMessage]) -> Result<(), SchedulerError> {
        (**self).publish(messages).await
    }
}

/// Asynchronous classifier response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierCallback {
    /// Correlation key echoed from the request.
    pub key: String,
    /// Scored phrases.
    #[serde(default)]
    pub phrases: Vec<ScoredPhrase>,
}
