//! Inbound event models.
//!
//! The host delivers every event as an address string plus a JSON payload.
//! Addresses are routed through an explicit table to typed events.

use serde::{Deserialize, Serialize};

use crate::core::{
    Classifier, ClassifierCallback, CyclePhase, DeliveryService, PriorityCalculator,
    SchedulerError, SchedulerOrchestrator,
};

/// Address of raw message batches.
pub const ADDRESS_MESSAGES_UPDATED: &str = "messages_updated";
/// Address of classifier callbacks.
pub const ADDRESS_AI: &str = "ai";

/// Event handled by an orchestrator turn.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A fresh raw message snapshot.
    MessagesUpdated(serde_json::Value),
    /// Scores for an earlier request.
    ClassifierResponse(ClassifierCallback),
}

impl InboundEvent {
    /// Route an address and payload to an event. Unknown addresses yield
    /// `None`.
    pub fn from_address(
        address: &str,
        payload: serde_json::Value,
    ) -> Result<Option<Self>, SchedulerError> {
        match address {
            ADDRESS_MESSAGES_UPDATED => Ok(Some(Self::MessagesUpdated(payload))),
            ADDRESS_AI => serde_json::from_value(payload)
                .map(|callback| Some(Self::ClassifierResponse(callback)))
                .map_err(|e| SchedulerError::InvalidEvent(format!("classifier callback: {e}"))),
            _ => Ok(None),
        }
    }

    /// Address this event is routed from.
    pub const fn address(&self) -> &'static str {
        match self {
            Self::MessagesUpdated(_) => ADDRESS_MESSAGES_UPDATED,
            Self::ClassifierResponse(_) => ADDRESS_AI,
        }
    }
}

/// Health response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Location served.
    pub location_id: String,
    /// Current cycle phase.
    pub phase: CyclePhase,
    /// Live messages in the buffer.
    pub buffered: usize,
    /// Records in the last published schedule.
    pub last_published: usize,
}

/// Report orchestrator health.
pub fn health<C, D, K>(orchestrator: &SchedulerOrchestrator<C, D, K>) -> Health
where
    C: Classifier,
    D: DeliveryService,
    K: PriorityCalculator,
{
    Health {
        ok: true,
        location_id: orchestrator.config().location_id.clone(),
        phase: orchestrator.phase(),
        buffered: orchestrator.buffer().len(),
        last_published: orchestrator.last_published().len(),
    }
}
