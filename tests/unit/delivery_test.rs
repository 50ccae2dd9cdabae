//! Tests for delivery and classifier backends

use engagement_scheduler::core::{
    Classifier, DeliveryService, MessageStatus, ScheduledMessage, SchedulerError, ScoringRequest,
};
use engagement_scheduler::infra::{InMemoryDelivery, JsonlDeliveryOutbox, RecordingClassifier};

fn record(id: &str, delivery_date_ms: i64) -> ScheduledMessage {
    ScheduledMessage {
        message_id: id.to_string(),
        status: MessageStatus::Scheduled,
        delivery_date_ms,
    }
}

#[tokio::test]
async fn test_in_memory_delivery_records_batches() {
    let delivery = InMemoryDelivery::new();
    let handle = delivery.clone();

    delivery.publish(&[record("a", 1_000)]).await.unwrap();
    delivery
        .publish(&[record("b", 2_000), record("c", 3_000)])
        .await
        .unwrap();

    let batches = handle.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(handle.last().unwrap().len(), 2);
}

#[tokio::test]
async fn test_in_memory_delivery_failure() {
    let delivery = InMemoryDelivery::new();
    delivery.set_failing(true);
    let err = delivery.publish(&[record("a", 1_000)]).await.unwrap_err();
    assert!(matches!(err, SchedulerError::Delivery(_)));
    assert!(delivery.batches().is_empty());
}

#[tokio::test]
async fn test_jsonl_outbox_appends() {
    let dir = std::env::temp_dir().join(format!("outbox-test-{}", uuid::Uuid::new_v4()));
    let outbox = JsonlDeliveryOutbox::new(&dir, "home-1").unwrap();

    outbox.publish(&[record("a", 1_000)]).await.unwrap();
    outbox.publish(&[record("b", 2_000)]).await.unwrap();

    let records = outbox.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].messages[0].message_id, "a");
    assert_eq!(records[1].messages[0].delivery_date_ms, 2_000);
    assert!(dir.join("home-1_outbox.jsonl").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_recording_classifier_answers_last_request() {
    let classifier = RecordingClassifier::new();
    classifier
        .submit(ScoringRequest {
            key: "engagement_scheduler:1".into(),
            phrases: vec!["sleep".into(), "walk: go outside".into()],
        })
        .await
        .unwrap();

    let callback = classifier
        .answer_last(|text| {
            if text.starts_with("sleep") {
                vec![0.0, 0.0, 0.9, 0.1]
            } else {
                vec![0.8, 0.1, 0.1, 0.0]
            }
        })
        .unwrap();
    assert_eq!(callback.key, "engagement_scheduler:1");
    assert_eq!(callback.phrases.len(), 2);
    assert_eq!(callback.phrases[1].text, "walk: go outside");
}

#[tokio::test]
async fn test_recording_classifier_failure() {
    let classifier = RecordingClassifier::new();
    classifier.set_failing(true);
    let err = classifier
        .submit(ScoringRequest {
            key: "k".into(),
            phrases: vec![],
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Classifier(_)));
    assert!(classifier.answer_last(|_| vec![]).is_none());
}
