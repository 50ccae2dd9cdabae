//! Core scheduling types: messages, scores, the priority buffer and the
//! orchestrator that drives it.

pub mod error;
pub mod message;
pub mod priority;
pub mod buffer;
pub mod state;
pub mod services;
pub mod audit;
pub mod orchestrator;

pub use error::{AppResult, SchedulerError};
pub use message::{
    Message, MessageStatus, RawMessage, ScheduledMessage, MAX_DELIVERY_DAY_TIME,
    SCHEDULE_TYPE_ONE_SHOT,
};
pub use priority::{ArgmaxCalculator, PriorityCalculator, PriorityScore, ScoredPhrase};
pub use buffer::{BufferSnapshot, EntrySnapshot, PriorityBuffer};
pub use state::{CyclePhase, SchedulerState, StateStore};
pub use services::{Classifier, ClassifierCallback, DeliveryService, ScoringRequest};
pub use audit::{build_cycle_event, AuditSink, CycleEvent, InMemoryAuditSink, TracingAuditSink};
pub use orchestrator::{parse_batch, SchedulerOrchestrator, TurnOutcome};
