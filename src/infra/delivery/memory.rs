//! In-memory delivery backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{DeliveryService, ScheduledMessage, SchedulerError};
use crate::util::clock::now_ms;

/// One recorded publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBatch {
    /// Records in the publish call.
    pub messages: Vec<ScheduledMessage>,
    /// Timestamp milliseconds.
    pub published_at_ms: i64,
}

/// Records every publish for development/testing. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDelivery {
    batches: Arc<Mutex<Vec<PublishedBatch>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryDelivery {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// All recorded publishes, oldest first.
    pub fn batches(&self) -> Vec<PublishedBatch> {
        self.batches.lock().clone()
    }

    /// Records from the most recent publish.
    pub fn last(&self) -> Option<Vec<ScheduledMessage>> {
        self.batches.lock().last().map(|b| b.messages.clone())
    }
}

#[async_trait]
impl DeliveryService for InMemoryDelivery {
    async fn publish(&self, messages: &[ScheduledMessage]) -> Result<(), SchedulerError> {
        if self.failing.load(Ordering::Acquire) {
            return Err(SchedulerError::Delivery("delivery service unavailable".into()));
        }
        self.batches.lock().push(PublishedBatch {
            messages: messages.to_vec(),
            published_at_ms: now_ms(),
        });
        Ok(())
    }
}
