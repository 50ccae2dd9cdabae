//! Tests for the cycle audit sink

use std::sync::Arc;

use engagement_scheduler::core::{build_cycle_event, AuditSink, CyclePhase, InMemoryAuditSink};
use parking_lot::Mutex;

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_cycle_event(
        "home-1",
        CyclePhase::AwaitingScores,
        Some("engagement_scheduler:abc".to_string()),
        None,
    ));

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].location_id, "home-1");
    assert_eq!(events[0].phase, CyclePhase::AwaitingScores);
    assert_eq!(
        events[0].correlation_key.as_deref(),
        Some("engagement_scheduler:abc")
    );
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_cycle_event("home-1", CyclePhase::MessagesReceived, None, None));
    sink.record(build_cycle_event("home-1", CyclePhase::AwaitingScores, None, None));
    sink.record(build_cycle_event("home-1", CyclePhase::ScoresReceived, None, None));

    assert_eq!(
        sink.phases(),
        vec![CyclePhase::AwaitingScores, CyclePhase::ScoresReceived]
    );
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_cycle_event("home-1", CyclePhase::Idle, None, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_shared_sink_records_through_arc() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(4)));
    let mut handle = Arc::clone(&shared);
    handle.record(build_cycle_event(
        "home-1",
        CyclePhase::Idle,
        None,
        Some("done".into()),
    ));
    assert_eq!(shared.lock().events()[0].detail.as_deref(), Some("done"));
}

#[test]
fn test_tracing_sink_accepts_events() {
    use engagement_scheduler::core::TracingAuditSink;

    let mut sink = TracingAuditSink;
    sink.record(build_cycle_event(
        "home-1",
        CyclePhase::ScoringFailed,
        None,
        Some("classifier unavailable".into()),
    ));
}
