//! In-memory state store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{SchedulerError, SchedulerState, StateStore};

/// Process-local state store. Clones share the same storage, so a test can
/// hand one clone to each simulated turn.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<Mutex<HashMap<String, SchedulerState>>>,
}

impl InMemoryStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locations with saved state.
    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    /// Whether no location has saved state.
    pub fn is_empty(&self) -> bool {
        self.states.lock().is_empty()
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self, location_id: &str) -> Result<Option<SchedulerState>, SchedulerError> {
        Ok(self.states.lock().get(location_id).cloned())
    }

    fn save(&self, location_id: &str, state: &SchedulerState) -> Result<(), SchedulerError> {
        self.states
            .lock()
            .insert(location_id.to_string(), state.clone());
        Ok(())
    }
}
