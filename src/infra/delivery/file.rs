//! File-backed delivery outbox.
//!
//! Each publish appends one JSON line holding the batch, for a separate
//! forwarder to drain.

use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{DeliveryService, ScheduledMessage, SchedulerError};
use crate::util::clock::now_ms;

/// One line of the outbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Timestamp milliseconds.
    pub published_at_ms: i64,
    /// Published records.
    pub messages: Vec<ScheduledMessage>,
}

/// Append-only JSONL outbox.
pub struct JsonlDeliveryOutbox {
    path: PathBuf,
    stream: String,
    write_lock: Mutex<()>,
}

impl JsonlDeliveryOutbox {
    /// Create an outbox at `<dir>/<stream>_outbox.jsonl`.
    pub fn new(dir: impl AsRef<Path>, stream: impl Into<String>) -> Result<Self, SchedulerError> {
        let path = dir.as_ref().to_path_buf();
        create_dir_all(&path).map_err(|e| SchedulerError::Backend(e.to_string()))?;
        Ok(Self {
            path,
            stream: stream.into(),
            write_lock: Mutex::new(()),
        })
    }

    fn file_path(&self) -> PathBuf {
        self.path.join(format!("{}_outbox.jsonl", self.stream))
    }

    /// Read every record written so far.
    pub fn read_all(&self) -> Result<Vec<OutboxRecord>, SchedulerError> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new()
            .read(true)
            .open(&file_path)
            .map_err(|e| SchedulerError::Backend(e.to_string()))?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| SchedulerError::Backend(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let record =
                serde_json::from_str(&line).map_err(|e| SchedulerError::Backend(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl DeliveryService for JsonlDeliveryOutbox {
    async fn publish(&self, messages: &[ScheduledMessage]) -> Result<(), SchedulerError> {
        let record = OutboxRecord {
            published_at_ms: now_ms(),
            messages: messages.to_vec(),
        };
        let line =
            serde_json::to_string(&record).map_err(|e| SchedulerError::Backend(e.to_string()))?;
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_path())
            .map_err(|e| SchedulerError::Delivery(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| SchedulerError::Delivery(e.to_string()))
    }
}
