//! Durable orchestrator state carried between host invocations.

use serde::{Deserialize, Serialize};

use crate::core::{BufferSnapshot, Message, ScheduledMessage, SchedulerError};

/// Position of a location in its rebuild cycle.
///
/// Only [`CyclePhase::Idle`] and [`CyclePhase::AwaitingScores`] survive the end
/// of a turn; the others are passed through within one turn and recorded in
/// the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// No cycle in flight.
    #[default]
    Idle,
    /// A raw batch was accepted and parsed.
    MessagesReceived,
    /// A scoring request is outstanding.
    AwaitingScores,
    /// Classifier scores arrived.
    ScoresReceived,
    /// Scoring could not be requested; default priorities are used.
    ScoringFailed,
    /// The schedule was handed to the delivery service.
    SchedulePublished,
}

/// Everything an orchestrator needs to resume on the next turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerState {
    /// Current phase.
    #[serde(default)]
    pub phase: CyclePhase,
    /// Buffer contents as of the end of the last turn.
    #[serde(default)]
    pub buffer: BufferSnapshot,
    /// Correlation key of the outstanding scoring request.
    #[serde(default)]
    pub pending_correlation_key: Option<String>,
    /// Parsed messages waiting for classifier scores.
    #[serde(default)]
    pub pending_messages: Vec<Message>,
    /// Last schedule handed to the delivery service.
    #[serde(default)]
    pub last_published: Vec<ScheduledMessage>,
}

/// Persistence for per-location scheduler state.
pub trait StateStore: Send + Sync {
    /// Load the state for a location, if any was saved.
    fn load(&self, location_id: &str) -> Result<Option<SchedulerState>, SchedulerError>;
    /// Persist the state for a location, replacing any previous value.
    fn save(&self, location_id: &str, state: &SchedulerState) -> Result<(), SchedulerError>;
}
