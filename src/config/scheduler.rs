//! Scheduler configuration structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default spacing between messages of the same topic (one hour).
pub const DEFAULT_TIME_THRESHOLD_SECS: i64 = 3600;
/// Default correlation-key prefix.
pub const DEFAULT_MICROSERVICE_KEY: &str = "engagement_scheduler";
const MAX_UTC_OFFSET_SECS: i64 = 14 * 3600;

/// State persistence backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StateBackendConfig {
    /// Process-local state for development/testing.
    #[default]
    InMemory,
    /// One JSON document per location under `dir`.
    File {
        /// Directory holding state documents.
        dir: PathBuf,
    },
}

/// Delivery backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum DeliveryBackendConfig {
    /// Record publishes in memory.
    #[default]
    InMemory,
    /// Append publishes to a JSONL outbox under `dir`.
    File {
        /// Outbox directory.
        dir: PathBuf,
    },
    /// POST publishes to a remote delivery API.
    Http {
        /// Endpoint URL.
        url: String,
    },
}

/// Classifier backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum ClassifierBackendConfig {
    /// Record requests in memory.
    #[default]
    InMemory,
    /// POST requests to a remote classification service.
    Http {
        /// Endpoint URL.
        url: String,
    },
}

/// Root scheduler configuration for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Household/location served by this orchestrator.
    pub location_id: String,
    /// Prefix of every correlation key this orchestrator issues.
    #[serde(default = "default_microservice_key")]
    pub microservice_key: String,
    /// Minimum spacing between messages of one topic, seconds.
    #[serde(default = "default_time_threshold")]
    pub time_threshold_secs: i64,
    /// Offset of local time from UTC, seconds.
    #[serde(default)]
    pub utc_offset_secs: i64,
    /// State backend.
    #[serde(default)]
    pub state: StateBackendConfig,
    /// Delivery backend.
    #[serde(default)]
    pub delivery: DeliveryBackendConfig,
    /// Classifier backend.
    #[serde(default)]
    pub classifier: ClassifierBackendConfig,
}

fn default_microservice_key() -> String {
    DEFAULT_MICROSERVICE_KEY.to_string()
}

const fn default_time_threshold() -> i64 {
    DEFAULT_TIME_THRESHOLD_SECS
}

impl SchedulerConfig {
    /// Configuration with defaults for everything but the location.
    pub fn new(location_id: impl Into<String>) -> Self {
        Self {
            location_id: location_id.into(),
            microservice_key: default_microservice_key(),
            time_threshold_secs: DEFAULT_TIME_THRESHOLD_SECS,
            utc_offset_secs: 0,
            state: StateBackendConfig::default(),
            delivery: DeliveryBackendConfig::default(),
            classifier: ClassifierBackendConfig::default(),
        }
    }

    /// Override the topic spacing threshold.
    #[must_use]
    pub const fn with_time_threshold_secs(mut self, secs: i64) -> Self {
        self.time_threshold_secs = secs;
        self
    }

    /// Override the correlation-key prefix.
    #[must_use]
    pub fn with_microservice_key(mut self, key: impl Into<String>) -> Self {
        self.microservice_key = key.into();
        self
    }

    /// Override the UTC offset.
    #[must_use]
    pub const fn with_utc_offset_secs(mut self, secs: i64) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.location_id.trim().is_empty() {
            return Err("location_id must not be empty".into());
        }
        if self.microservice_key.trim().is_empty() {
            return Err("microservice_key must not be empty".into());
        }
        if self.time_threshold_secs <= 0 {
            return Err("time_threshold_secs must be greater than 0".into());
        }
        if self.utc_offset_secs.abs() > MAX_UTC_OFFSET_SECS {
            return Err(format!(
                "utc_offset_secs must be within ±{MAX_UTC_OFFSET_SECS}"
            ));
        }
        match &self.delivery {
            DeliveryBackendConfig::Http { url } if url.trim().is_empty() => {
                return Err("delivery url must not be empty".into());
            }
            _ => {}
        }
        match &self.classifier {
            ClassifierBackendConfig::Http { url } if url.trim().is_empty() => {
                return Err("classifier url must not be empty".into());
            }
            _ => {}
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from `ENGAGEMENT_*` environment variables, loading
    /// a `.env` file first if present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup.
    ///
    /// Recognized keys: `ENGAGEMENT_LOCATION_ID` (required),
    /// `ENGAGEMENT_MICROSERVICE_KEY`, `ENGAGEMENT_TIME_THRESHOLD_SECS`,
    /// `ENGAGEMENT_UTC_OFFSET_SECS`, `ENGAGEMENT_STATE_DIR`,
    /// `ENGAGEMENT_OUTBOX_DIR`, `ENGAGEMENT_DELIVERY_URL`,
    /// `ENGAGEMENT_CLASSIFIER_URL`. A delivery URL wins over an outbox dir.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let location_id =
            lookup("ENGAGEMENT_LOCATION_ID").ok_or("ENGAGEMENT_LOCATION_ID is not set")?;
        let mut cfg = Self::new(location_id);
        if let Some(key) = lookup("ENGAGEMENT_MICROSERVICE_KEY") {
            cfg.microservice_key = key;
        }
        if let Some(raw) = lookup("ENGAGEMENT_TIME_THRESHOLD_SECS") {
            cfg.time_threshold_secs = raw
                .parse()
                .map_err(|e| format!("ENGAGEMENT_TIME_THRESHOLD_SECS invalid: {e}"))?;
        }
        if let Some(raw) = lookup("ENGAGEMENT_UTC_OFFSET_SECS") {
            cfg.utc_offset_secs = raw
                .parse()
                .map_err(|e| format!("ENGAGEMENT_UTC_OFFSET_SECS invalid: {e}"))?;
        }
        if let Some(dir) = lookup("ENGAGEMENT_STATE_DIR") {
            cfg.state = StateBackendConfig::File { dir: dir.into() };
        }
        if let Some(url) = lookup("ENGAGEMENT_DELIVERY_URL") {
            cfg.delivery = DeliveryBackendConfig::Http { url };
        } else if let Some(dir) = lookup("ENGAGEMENT_OUTBOX_DIR") {
            cfg.delivery = DeliveryBackendConfig::File { dir: dir.into() };
        }
        if let Some(url) = lookup("ENGAGEMENT_CLASSIFIER_URL") {
            cfg.classifier = ClassifierBackendConfig::Http { url };
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
