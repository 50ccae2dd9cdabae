//! Classifier backends.

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

#[cfg(feature = "http")]
pub use http::HttpClassifier;
pub use memory::RecordingClassifier;
