//! Tests for configuration validation

use std::collections::HashMap;

use engagement_scheduler::config::{
    ClassifierBackendConfig, DeliveryBackendConfig, SchedulerConfig, StateBackendConfig,
    DEFAULT_MICROSERVICE_KEY, DEFAULT_TIME_THRESHOLD_SECS,
};

#[test]
fn test_defaults_are_valid() {
    let config = SchedulerConfig::new("home-1");
    assert!(config.validate().is_ok());
    assert_eq!(config.time_threshold_secs, DEFAULT_TIME_THRESHOLD_SECS);
    assert_eq!(config.microservice_key, DEFAULT_MICROSERVICE_KEY);
    assert_eq!(config.state, StateBackendConfig::InMemory);
}

#[test]
fn test_invalid_location() {
    assert!(SchedulerConfig::new("  ").validate().is_err());
}

#[test]
fn test_invalid_threshold() {
    let config = SchedulerConfig::new("home-1").with_time_threshold_secs(0);
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_utc_offset() {
    let config = SchedulerConfig::new("home-1").with_utc_offset_secs(15 * 3600);
    assert!(config.validate().is_err());
}

#[test]
fn test_empty_delivery_url() {
    let mut config = SchedulerConfig::new("home-1");
    config.delivery = DeliveryBackendConfig::Http { url: " ".into() };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "location_id": "home-1",
        "time_threshold_secs": 900,
        "utc_offset_secs": -18000,
        "state": { "backend": "file", "dir": "/var/lib/engagement" },
        "delivery": { "backend": "http", "url": "https://delivery.example/api" },
        "classifier": { "backend": "in_memory" }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.time_threshold_secs, 900);
    assert_eq!(config.utc_offset_secs, -18000);
    assert_eq!(config.microservice_key, DEFAULT_MICROSERVICE_KEY);
    assert_eq!(
        config.state,
        StateBackendConfig::File {
            dir: "/var/lib/engagement".into()
        }
    );
    assert_eq!(config.classifier, ClassifierBackendConfig::InMemory);
}

#[test]
fn test_scheduler_config_from_json_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{"location_id": ""}"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ENGAGEMENT_LOCATION_ID", "home-7"),
        ("ENGAGEMENT_TIME_THRESHOLD_SECS", "120"),
        ("ENGAGEMENT_OUTBOX_DIR", "/tmp/outbox"),
        ("ENGAGEMENT_CLASSIFIER_URL", "http://classifier.local/score"),
    ]);
    let config =
        SchedulerConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(config.location_id, "home-7");
    assert_eq!(config.time_threshold_secs, 120);
    assert_eq!(
        config.delivery,
        DeliveryBackendConfig::File {
            dir: "/tmp/outbox".into()
        }
    );
    assert_eq!(
        config.classifier,
        ClassifierBackendConfig::Http {
            url: "http://classifier.local/score".into()
        }
    );
}

#[test]
fn test_from_lookup_rejects_bad_input() {
    assert!(SchedulerConfig::from_lookup(|_| None).is_err());
    let bad_threshold = SchedulerConfig::from_lookup(|key| match key {
        "ENGAGEMENT_LOCATION_ID" => Some("home-1".into()),
        "ENGAGEMENT_TIME_THRESHOLD_SECS" => Some("soon".into()),
        _ => None,
    });
    assert!(bad_threshold.is_err());
}

#[test]
fn test_from_env() {
    std::env::set_var("ENGAGEMENT_LOCATION_ID", "home-env");
    std::env::set_var("ENGAGEMENT_UTC_OFFSET_SECS", "3600");
    let config = SchedulerConfig::from_env().unwrap();
    assert_eq!(config.location_id, "home-env");
    assert_eq!(config.utc_offset_secs, 3600);
}
