//! Builders to construct scheduler components from configuration.

pub mod orchestrator_builder;

pub use orchestrator_builder::{build_orchestrator, build_state_store, DynOrchestrator};
