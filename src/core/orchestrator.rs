//! Per-location scheduling cycle.
//!
//! One orchestrator owns the priority buffer for one household. A cycle runs
//! across two host turns:
//!
//! 1. [`SchedulerOrchestrator::messages_updated`] parses the raw batch,
//!    clears the buffer and submits the priority phrases for scoring.
//! 2. [`SchedulerOrchestrator::ai`] receives the scores, rebuilds the buffer,
//!    computes delivery times and publishes them.
//!
//! If the scoring request cannot be submitted, step 2 runs immediately with
//! default priorities so delivery timing still progresses.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::core::{
    build_cycle_event, AuditSink, Classifier, ClassifierCallback, CyclePhase, DeliveryService,
    Message, MessageStatus, PriorityBuffer, PriorityCalculator, RawMessage, ScheduledMessage,
    SchedulerError, SchedulerState, ScoredPhrase, ScoringRequest, SCHEDULE_TYPE_ONE_SHOT,
};
use crate::util::clock::TurnClock;

/// Result of handling one inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Scoring request submitted; waiting for the callback.
    AwaitingScores {
        /// Key the callback must carry.
        correlation_key: String,
    },
    /// Schedule computed and handed to the delivery service.
    Published {
        /// Records that were published.
        scheduled: Vec<ScheduledMessage>,
    },
    /// Event did not belong to the outstanding request.
    Ignored,
}

/// Drives the rebuild cycle for one location.
pub struct SchedulerOrchestrator<C, D, K> {
    config: SchedulerConfig,
    classifier: C,
    delivery: D,
    calculator: K,
    buffer: PriorityBuffer,
    phase: CyclePhase,
    pending_correlation_key: Option<String>,
    pending_messages: Vec<Message>,
    last_published: Vec<ScheduledMessage>,
    audit: Option<Box<dyn AuditSink>>,
}

impl<C, D, K> SchedulerOrchestrator<C, D, K>
where
    C: Classifier,
    D: DeliveryService,
    K: PriorityCalculator,
{
    /// Create an idle orchestrator with an empty buffer.
    pub fn new(config: SchedulerConfig, classifier: C, delivery: D, calculator: K) -> Self {
        Self {
            config,
            classifier,
            delivery,
            calculator,
            buffer: PriorityBuffer::new(),
            phase: CyclePhase::Idle,
            pending_correlation_key: None,
            pending_messages: Vec::new(),
            last_published: Vec::new(),
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Replace in-memory state with persisted state.
    pub fn load_state(&mut self, state: SchedulerState) {
        self.buffer = PriorityBuffer::restore(state.buffer);
        self.phase = state.phase;
        self.pending_correlation_key = state.pending_correlation_key;
        self.pending_messages = state.pending_messages;
        self.last_published = state.last_published;
    }

    /// Persistable copy of the current state.
    pub fn state(&self) -> SchedulerState {
        SchedulerState {
            phase: self.phase,
            buffer: self.buffer.snapshot(),
            pending_correlation_key: self.pending_correlation_key.clone(),
            pending_messages: self.pending_messages.clone(),
            last_published: self.last_published.clone(),
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// The buffer as of the last rebuild.
    pub const fn buffer(&self) -> &PriorityBuffer {
        &self.buffer
    }

    /// Configuration this orchestrator was built with.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Last successfully published schedule.
    pub fn last_published(&self) -> &[ScheduledMessage] {
        &self.last_published
    }

    /// Start a cycle from a fresh raw snapshot.
    ///
    /// A batch that cannot be parsed aborts the cycle and leaves the buffer
    /// and previous schedule untouched.
    pub async fn messages_updated(
        &mut self,
        batch: &serde_json::Value,
        clock: TurnClock,
    ) -> Result<TurnOutcome, SchedulerError> {
        let messages = match parse_batch(batch) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::error!(location = %self.config.location_id, "aborting cycle: {e}");
                return Err(e);
            }
        };

        self.buffer.clear_buffer();
        let phrases = ready_phrases(&messages);
        self.transition(
            CyclePhase::MessagesReceived,
            Some(format!("{} messages, {} phrases", messages.len(), phrases.len())),
        );
        self.pending_messages = messages;

        if phrases.is_empty() {
            tracing::debug!("no ready messages to score");
            return self.process_scores(&[], clock).await;
        }

        let key = format!("{}:{}", self.config.microservice_key, Uuid::new_v4());
        self.pending_correlation_key = Some(key.clone());
        let request = ScoringRequest {
            key: key.clone(),
            phrases,
        };
        match self.classifier.submit(request).await {
            Ok(()) => {
                self.transition(CyclePhase::AwaitingScores, None);
                Ok(TurnOutcome::AwaitingScores {
                    correlation_key: key,
                })
            }
            Err(e) => {
                tracing::error!(
                    location = %self.config.location_id,
                    "scoring request failed, using default priorities: {e}"
                );
                self.transition(CyclePhase::ScoringFailed, Some(e.to_string()));
                self.process_scores(&[], clock).await
            }
        }
    }

    /// Handle the classifier's response.
    ///
    /// Responses for other consumers or for superseded requests are ignored.
    pub async fn ai(
        &mut self,
        callback: ClassifierCallback,
        clock: TurnClock,
    ) -> Result<TurnOutcome, SchedulerError> {
        let expected = self.pending_correlation_key.as_deref();
        if self.phase != CyclePhase::AwaitingScores || expected != Some(callback.key.as_str()) {
            if callback.key.starts_with(&self.config.microservice_key) {
                tracing::warn!(key = %callback.key, "ignoring stale classifier response");
            } else {
                tracing::debug!(key = %callback.key, "ignoring classifier response for another consumer");
            }
            return Ok(TurnOutcome::Ignored);
        }

        self.transition(
            CyclePhase::ScoresReceived,
            Some(format!("{} scored phrases", callback.phrases.len())),
        );
        self.process_scores(&callback.phrases, clock).await
    }

    async fn process_scores(
        &mut self,
        scored_phrases: &[ScoredPhrase],
        clock: TurnClock,
    ) -> Result<TurnOutcome, SchedulerError> {
        self.pending_correlation_key = None;
        let messages = std::mem::take(&mut self.pending_messages);
        self.buffer.clear_buffer();
        self.buffer
            .add_messages_with_priority(messages, scored_phrases, &self.calculator);

        let scheduled = self.buffer.get_scheduled_messages_with_adjusted_delivery_times(
            self.config.time_threshold_secs,
            clock.midnight_timestamp,
            clock.current_timestamp,
        );

        if !scheduled.is_empty() {
            if let Err(e) = self.delivery.publish(&scheduled).await {
                tracing::error!(location = %self.config.location_id, "publish failed: {e}");
                self.transition(CyclePhase::Idle, Some(format!("publish failed: {e}")));
                return Err(e);
            }
        }

        self.last_published.clone_from(&scheduled);
        self.transition(
            CyclePhase::SchedulePublished,
            Some(format!("{} scheduled", scheduled.len())),
        );
        self.transition(CyclePhase::Idle, None);
        Ok(TurnOutcome::Published { scheduled })
    }

    fn transition(&mut self, phase: CyclePhase, detail: Option<String>) {
        tracing::info!(
            location = %self.config.location_id,
            from = ?self.phase,
            to = ?phase,
            "cycle transition"
        );
        self.phase = phase;
        if let Some(audit) = self.audit.as_mut() {
            audit.record(build_cycle_event(
                self.config.location_id.clone(),
                phase,
                self.pending_correlation_key.clone(),
                detail,
            ));
        }
    }
}

/// Turn a raw batch into buffer-eligible messages.
///
/// Recurring and user-targeted records are skipped; malformed records are
/// dropped with a warning. The batch as a whole fails when it is not a list,
/// or when it had eligible records and none of them parsed. A record that
/// does not even deserialize counts as eligible unless it visibly carries a
/// recurring `schedule_type` or a `user_id`.
pub fn parse_batch(batch: &serde_json::Value) -> Result<Vec<Message>, SchedulerError> {
    let records = batch
        .as_array()
        .ok_or_else(|| SchedulerError::BatchParse("message batch is not a list".into()))?;

    let mut eligible = 0_usize;
    let mut messages = Vec::with_capacity(records.len());
    for record in records {
        let raw: RawMessage = match serde_json::from_value(record.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                if !is_provably_ineligible(record) {
                    eligible += 1;
                }
                tracing::warn!("dropping malformed message record: {e}");
                continue;
            }
        };
        if !raw.is_eligible() {
            continue;
        }
        eligible += 1;
        match Message::try_from(raw) {
            Ok(message) => messages.push(message),
            Err(e) => tracing::warn!("dropping invalid message: {e}"),
        }
    }

    if eligible > 0 && messages.is_empty() {
        return Err(SchedulerError::BatchParse(format!(
            "none of {eligible} eligible records could be parsed"
        )));
    }
    Ok(messages)
}

fn is_provably_ineligible(record: &serde_json::Value) -> bool {
    let Some(fields) = record.as_object() else {
        return false;
    };
    let recurring = fields
        .get("schedule_type")
        .and_then(serde_json::Value::as_i64)
        .is_some_and(|t| t != SCHEDULE_TYPE_ONE_SHOT);
    let targeted = fields.get("user_id").is_some_and(|u| !u.is_null());
    recurring || targeted
}

fn ready_phrases(messages: &[Message]) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .filter(|m| m.status() == MessageStatus::Ready)
        .map(Message::priority_phrase)
        .filter(|phrase| seen.insert(phrase.clone()))
        .collect()
}
