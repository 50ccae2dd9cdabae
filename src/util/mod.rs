//! Shared utilities.

pub mod clock;
pub mod serde;
pub mod telemetry;

pub use clock::*;
pub use telemetry::*;
