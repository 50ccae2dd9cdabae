//! Tests for configuration-driven builders

use engagement_scheduler::builders::{build_orchestrator, build_state_store};
use engagement_scheduler::config::{SchedulerConfig, StateBackendConfig};
use engagement_scheduler::core::{CyclePhase, SchedulerError};

#[test]
fn test_build_orchestrator_defaults() {
    let config = SchedulerConfig::new("home-1").with_time_threshold_secs(600);
    let orchestrator = build_orchestrator(&config).unwrap();
    assert_eq!(orchestrator.phase(), CyclePhase::Idle);
    assert_eq!(orchestrator.config().time_threshold_secs, 600);
    assert!(orchestrator.buffer().is_empty());
}

#[test]
fn test_build_orchestrator_rejects_invalid_config() {
    let config = SchedulerConfig::new("home-1").with_time_threshold_secs(-5);
    match build_orchestrator(&config) {
        Err(SchedulerError::Config(msg)) => assert!(msg.contains("config invalid")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid config accepted"),
    }
}

#[test]
fn test_build_file_state_store() {
    let dir = std::env::temp_dir().join(format!("state-builder-{}", uuid::Uuid::new_v4()));
    let mut config = SchedulerConfig::new("home-1");
    config.state = StateBackendConfig::File { dir: dir.clone() };

    let store = build_state_store(&config).unwrap();
    assert!(store.load("home-1").unwrap().is_none());
    assert!(dir.exists());

    let _ = std::fs::remove_dir_all(&dir);
}
