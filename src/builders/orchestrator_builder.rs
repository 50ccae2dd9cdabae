//! Builds an orchestrator and its state store from configuration.

use crate::config::{
    ClassifierBackendConfig, DeliveryBackendConfig, SchedulerConfig, StateBackendConfig,
};
use crate::core::{
    ArgmaxCalculator, Classifier, DeliveryService, SchedulerError, SchedulerOrchestrator,
    StateStore,
};
use crate::infra::{FileStateStore, InMemoryDelivery, InMemoryStateStore, JsonlDeliveryOutbox, RecordingClassifier};

/// Orchestrator with backends chosen at runtime.
pub type DynOrchestrator =
    SchedulerOrchestrator<Box<dyn Classifier>, Box<dyn DeliveryService>, ArgmaxCalculator>;

/// Build an orchestrator for the configured location and backends.
pub fn build_orchestrator(cfg: &SchedulerConfig) -> Result<DynOrchestrator, SchedulerError> {
    cfg.validate()
        .map_err(|e| SchedulerError::Config(format!("config invalid: {e}")))?;

    let classifier: Box<dyn Classifier> = match &cfg.classifier {
        ClassifierBackendConfig::InMemory => Box::new(RecordingClassifier::new()),
        ClassifierBackendConfig::Http { url } => http_classifier(url)?,
    };
    let delivery: Box<dyn DeliveryService> = match &cfg.delivery {
        DeliveryBackendConfig::InMemory => Box::new(InMemoryDelivery::new()),
        DeliveryBackendConfig::File { dir } => {
            Box::new(JsonlDeliveryOutbox::new(dir, cfg.location_id.as_str())?)
        }
        DeliveryBackendConfig::Http { url } => http_delivery(url, &cfg.location_id)?,
    };

    Ok(SchedulerOrchestrator::new(
        cfg.clone(),
        classifier,
        delivery,
        ArgmaxCalculator,
    ))
}

/// Build the configured state store.
pub fn build_state_store(cfg: &SchedulerConfig) -> Result<Box<dyn StateStore>, SchedulerError> {
    Ok(match &cfg.state {
        StateBackendConfig::InMemory => Box::new(InMemoryStateStore::new()),
        StateBackendConfig::File { dir } => Box::new(FileStateStore::new(dir)?),
    })
}

#[cfg(feature = "http")]
fn http_classifier(url: &str) -> Result<Box<dyn Classifier>, SchedulerError> {
    Ok(Box::new(crate::infra::classifier::HttpClassifier::new(url)))
}

#[cfg(not(feature = "http"))]
fn http_classifier(_url: &str) -> Result<Box<dyn Classifier>, SchedulerError> {
    Err(SchedulerError::Config(
        "http classifier requires the `http` feature".into(),
    ))
}

#[cfg(feature = "http")]
fn http_delivery(url: &str, location_id: &str) -> Result<Box<dyn DeliveryService>, SchedulerError> {
    Ok(Box::new(crate::infra::delivery::HttpDelivery::new(url, location_id)))
}

#[cfg(not(feature = "http"))]
fn http_delivery(_url: &str, _location_id: &str) -> Result<Box<dyn DeliveryService>, SchedulerError> {
    Err(SchedulerError::Config(
        "http delivery requires the `http` feature".into(),
    ))
}
