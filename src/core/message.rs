//! Message records flowing through the scheduler.
//!
//! Raw records arrive from the host as loosely-typed JSON. Only one-shot,
//! household-wide records are turned into [`Message`] values; everything
//! else is filtered out before it reaches the buffer.

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Delivery lifecycle of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    /// Waiting for a delivery time to be assigned.
    Ready,
    /// Delivery time assigned and handed to the delivery service.
    Scheduled,
    /// Already delivered; never rescheduled.
    Delivered,
}

/// Raw `schedule_type` value for one-shot messages. Recurring messages (`1`)
/// are not buffered.
pub const SCHEDULE_TYPE_ONE_SHOT: i64 = 0;

/// Largest accepted `delivery_day_time`: seven days past local midnight.
pub const MAX_DELIVERY_DAY_TIME: i64 = 7 * 86_400;

/// A candidate notification for a household.
///
/// Messages are immutable: an update is a new `Message` with the same
/// `message_id` that replaces the old buffer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    message_id: String,
    topic_id: String,
    status: MessageStatus,
    delivery_day_time: i64,
    max_delivery_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl Message {
    /// Create a validated message.
    ///
    /// `delivery_day_time` is seconds from local midnight; `max_delivery_time`
    /// is an absolute epoch timestamp in milliseconds.
    pub fn new(
        message_id: impl Into<String>,
        topic_id: impl Into<String>,
        status: MessageStatus,
        delivery_day_time: i64,
        max_delivery_time: i64,
    ) -> Result<Self, SchedulerError> {
        let message_id = message_id.into();
        let topic_id = topic_id.into();
        if message_id.trim().is_empty() {
            return Err(SchedulerError::InvalidMessage("message_id is empty".into()));
        }
        if topic_id.trim().is_empty() {
            return Err(SchedulerError::InvalidMessage(format!(
                "message `{message_id}` has an empty topic_id"
            )));
        }
        if delivery_day_time < 0 {
            return Err(SchedulerError::InvalidMessage(format!(
                "message `{message_id}` has negative delivery_day_time {delivery_day_time}"
            )));
        }
        if delivery_day_time > MAX_DELIVERY_DAY_TIME {
            return Err(SchedulerError::InvalidMessage(format!(
                "message `{message_id}` has delivery_day_time {delivery_day_time} beyond {MAX_DELIVERY_DAY_TIME}"
            )));
        }
        if max_delivery_time < 0 {
            return Err(SchedulerError::InvalidMessage(format!(
                "message `{message_id}` has negative max_delivery_time {max_delivery_time}"
            )));
        }
        Ok(Self {
            message_id,
            topic_id,
            status,
            delivery_day_time,
            max_delivery_time,
            content: None,
        })
    }

    /// Attach the human-readable content used to derive the priority phrase.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Copy of this message with a different status.
    #[must_use]
    pub fn with_status(&self, status: MessageStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Unique message identifier.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Topic grouping key.
    pub fn topic_id(&self) -> &str {
        &self.topic_id
    }

    /// Current status.
    pub const fn status(&self) -> MessageStatus {
        self.status
    }

    /// Requested delivery time in seconds from local midnight.
    pub const fn delivery_day_time(&self) -> i64 {
        self.delivery_day_time
    }

    /// Hard delivery ceiling in epoch milliseconds.
    pub const fn max_delivery_time(&self) -> i64 {
        self.max_delivery_time
    }

    /// Optional content text.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Text submitted to the classifier for importance scoring.
    pub fn priority_phrase(&self) -> String {
        match self.content.as_deref().map(str::trim) {
            Some(content) if !content.is_empty() => format!("{}: {content}", self.topic_id),
            _ => self.topic_id.clone(),
        }
    }
}

/// Loosely-typed inbound record as supplied by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    /// Unique message identifier.
    pub message_id: Option<String>,
    /// Topic grouping key.
    pub topic_id: Option<String>,
    /// Lifecycle status.
    pub status: Option<MessageStatus>,
    /// Requested delivery offset from midnight, seconds.
    pub delivery_day_time: Option<i64>,
    /// Hard ceiling, epoch milliseconds.
    pub max_delivery_time: Option<i64>,
    /// Recurrence mode; `0` is one-shot.
    #[serde(default)]
    pub schedule_type: i64,
    /// Explicit per-user target. Presence excludes the record from buffering.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Content text.
    #[serde(default)]
    pub content: Option<String>,
}

impl RawMessage {
    /// Whether this record may enter the buffer at all.
    pub const fn is_eligible(&self) -> bool {
        self.schedule_type == SCHEDULE_TYPE_ONE_SHOT && self.user_id.is_none()
    }
}

impl TryFrom<RawMessage> for Message {
    type Error = SchedulerError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        let message_id = raw
            .message_id
            .ok_or_else(|| SchedulerError::InvalidMessage("missing message_id".into()))?;
        let missing =
            |field: &str| SchedulerError::InvalidMessage(format!("message `{message_id}` missing {field}"));
        let topic_id = raw.topic_id.ok_or_else(|| missing("topic_id"))?;
        let status = raw.status.ok_or_else(|| missing("status"))?;
        let delivery_day_time = raw.delivery_day_time.ok_or_else(|| missing("delivery_day_time"))?;
        let max_delivery_time = raw.max_delivery_time.ok_or_else(|| missing("max_delivery_time"))?;

        let message = Self::new(
            message_id,
            topic_id,
            status,
            delivery_day_time,
            max_delivery_time,
        )?;
        Ok(match raw.content {
            Some(content) => message.with_content(content),
            None => message,
        })
    }
}

/// Outbound record for a message whose delivery time has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMessage {
    /// Message identifier.
    pub message_id: String,
    /// Always [`MessageStatus::Scheduled`] for published records.
    pub status: MessageStatus,
    /// Absolute delivery time in epoch milliseconds, serialized as a string.
    #[serde(rename = "delivery_date", with = "crate::util::serde::epoch_ms_string")]
    pub delivery_date_ms: i64,
}
