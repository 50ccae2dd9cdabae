//! Tests for inbound event routing

use engagement_scheduler::core::SchedulerError;
use engagement_scheduler::runtime::{InboundEvent, ADDRESS_AI, ADDRESS_MESSAGES_UPDATED};
use serde_json::json;

#[test]
fn test_messages_updated_address() {
    let event = InboundEvent::from_address(ADDRESS_MESSAGES_UPDATED, json!([]))
        .unwrap()
        .unwrap();
    assert_eq!(event, InboundEvent::MessagesUpdated(json!([])));
    assert_eq!(event.address(), "messages_updated");
}

#[test]
fn test_ai_address_parses_callback() {
    let payload = json!({
        "key": "engagement_scheduler:abc",
        "phrases": [{"text": "sleep", "scores": [0.1, 0.9]}]
    });
    let event = InboundEvent::from_address(ADDRESS_AI, payload).unwrap().unwrap();
    match event {
        InboundEvent::ClassifierResponse(callback) => {
            assert_eq!(callback.key, "engagement_scheduler:abc");
            assert_eq!(callback.phrases[0].scores, vec![0.1, 0.9]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_ai_address_rejects_bad_payload() {
    let err = InboundEvent::from_address(ADDRESS_AI, json!(["not", "a", "callback"])).unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidEvent(_)));
}

#[test]
fn test_unknown_address() {
    assert!(InboundEvent::from_address("heartbeat", json!({}))
        .unwrap()
        .is_none());
}
