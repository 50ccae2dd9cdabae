//! HTTP delivery backend.

use async_trait::async_trait;
use serde::Serialize;

use crate::core::{DeliveryService, ScheduledMessage, SchedulerError};

#[derive(Serialize)]
struct PublishBody<'a> {
    location_id: &'a str,
    messages: &'a [ScheduledMessage],
}

/// POSTs schedules as JSON to a remote delivery API.
#[derive(Debug, Clone)]
pub struct HttpDelivery {
    client: reqwest::Client,
    url: String,
    location_id: String,
}

impl HttpDelivery {
    /// Create a client for `url`.
    pub fn new(url: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            location_id: location_id.into(),
        }
    }
}

#[async_trait]
impl DeliveryService for HttpDelivery {
    async fn publish(&self, messages: &[ScheduledMessage]) -> Result<(), SchedulerError> {
        let body = PublishBody {
            location_id: &self.location_id,
            messages,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SchedulerError::Delivery(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SchedulerError::Delivery(format!(
                "delivery API returned {}",
                response.status()
            )));
        }
        tracing::debug!(count = messages.len(), url = %self.url, "schedule published");
        Ok(())
    }
}
