//! Tests for error types

use engagement_scheduler::core::{AppResult, SchedulerError};

#[test]
fn test_unknown_message_error() {
    let err = SchedulerError::UnknownMessage("m1".to_string());
    assert_eq!(format!("{}", err), "unknown message: m1");
}

#[test]
fn test_batch_parse_error() {
    let err = SchedulerError::BatchParse("not a list".to_string());
    assert_eq!(format!("{}", err), "batch parse error: not a list");
}

#[test]
fn test_classifier_error() {
    let err = SchedulerError::Classifier("timeout".to_string());
    assert_eq!(format!("{}", err), "classifier error: timeout");
}

#[test]
fn test_delivery_error() {
    let err = SchedulerError::Delivery("503".to_string());
    assert_eq!(format!("{}", err), "delivery error: 503");
}

#[test]
fn test_backend_error() {
    let err = SchedulerError::Backend("disk full".to_string());
    assert_eq!(format!("{}", err), "backend error: disk full");
}

#[test]
fn test_app_result_wraps_scheduler_error() {
    fn fails() -> AppResult<()> {
        Err(SchedulerError::Config("bad".into()).into())
    }
    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "config error: bad");
    assert!(err.downcast_ref::<SchedulerError>().is_some());
}
