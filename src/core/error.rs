//! Error types for buffer and orchestration operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Message id is not tracked by the buffer.
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    /// Message record failed construction-time validation.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
    /// Raw batch could not be parsed as a whole.
    #[error("batch parse error: {0}")]
    BatchParse(String),
    /// Inbound event payload does not match its address.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
    /// Scoring request could not be submitted to the classifier.
    #[error("classifier error: {0}")]
    Classifier(String),
    /// Schedule could not be published to the delivery service.
    #[error("delivery error: {0}")]
    Delivery(String),
    /// Backend-specific failure with context.
    #[error("backend error: {0}")]
    Backend(String),
    /// Configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
