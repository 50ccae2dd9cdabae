//! Configuration models for the scheduler and its backends.

pub mod scheduler;

pub use scheduler::{
    ClassifierBackendConfig, DeliveryBackendConfig, SchedulerConfig, StateBackendConfig,
    DEFAULT_MICROSERVICE_KEY, DEFAULT_TIME_THRESHOLD_SECS,
};
