//! Audit trail for scheduling cycles.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::CyclePhase;
use crate::util::clock::now_ms;

/// One phase transition of a location's scheduling cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleEvent {
    /// Location the orchestrator serves.
    pub location_id: String,
    /// Phase entered.
    pub phase: CyclePhase,
    /// Correlation key of the scoring request, when one exists.
    pub correlation_key: Option<String>,
    /// Free-form detail (counts, error text).
    pub detail: Option<String>,
    /// Timestamp milliseconds.
    pub created_at_ms: i64,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record a cycle event.
    fn record(&mut self, event: CycleEvent);
}

/// Bounded in-memory sink for tests and local hosts.
pub struct InMemoryAuditSink {
    events: VecDeque<CycleEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<CycleEvent> {
        self.events.iter().cloned().collect()
    }

    /// Phases recorded so far, oldest first.
    pub fn phases(&self) -> Vec<CyclePhase> {
        self.events.iter().map(|e| e.phase).collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: CycleEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Audit sink that only emits tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: CycleEvent) {
        tracing::info!(
            location = %event.location_id,
            phase = ?event.phase,
            key = event.correlation_key.as_deref().unwrap_or("-"),
            detail = event.detail.as_deref().unwrap_or(""),
            "cycle transition"
        );
    }
}

/// Helper to build a cycle event stamped with the current time.
pub fn build_cycle_event(
    location_id: impl Into<String>,
    phase: CyclePhase,
    correlation_key: Option<String>,
    detail: Option<String>,
) -> CycleEvent {
    CycleEvent {
        location_id: location_id.into(),
        phase,
        correlation_key,
        detail,
        created_at_ms: now_ms(),
    }
}

/// Shared sink, so a host can read events back after handing one to an
/// orchestrator.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: CycleEvent) {
        self.lock().record(event);
    }
}
