//! Host-facing event models and the per-turn driver.

pub mod api;
pub mod turn;

pub use api::{health, Health, InboundEvent, ADDRESS_AI, ADDRESS_MESSAGES_UPDATED};
pub use turn::{dispatch, run_address_turn, run_turn};
