//! Infrastructure adapters for state, delivery and classification.

pub mod classifier;
pub mod delivery;
pub mod state;

pub use classifier::RecordingClassifier;
pub use delivery::{InMemoryDelivery, JsonlDeliveryOutbox};
pub use state::{FileStateStore, InMemoryStateStore};
