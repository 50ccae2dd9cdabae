//! # Engagement Scheduler
//!
//! Topic-aware delivery scheduling for household engagement messages.
//!
//! Candidate notifications arrive from the host as raw batches. The scheduler
//! keeps the one-shot, household-wide ones, asks an external classifier to
//! score their priority phrases, and computes delivery times that keep
//! messages of the same topic apart without ever delaying a message past its
//! own ceiling.
//!
//! ## Core Problem Solved
//!
//! A household receives reminders from many independent producers. Left
//! alone they pile up: three hydration nudges within ten minutes, a sleep
//! reminder scheduled for a time that has already passed. The scheduler
//! turns the current snapshot into a single conflict-free schedule:
//!
//! - **Priority Buffer**: a lazy-deletion binary heap ordered by requested
//!   time, then topic priority, then insertion order
//! - **Topic Spacing**: same-topic messages at least one threshold apart,
//!   capped at each message's `max_delivery_time`
//! - **Past-Time Correction**: nothing is scheduled earlier than one
//!   threshold from now
//! - **Turn-Based Orchestration**: scoring is a fire-and-forget request plus
//!   a later callback, with state persisted between host turns
//!
//! ## Example
//!
//! ```rust,ignore
//! use engagement_scheduler::config::SchedulerConfig;
//! use engagement_scheduler::core::{ArgmaxCalculator, SchedulerOrchestrator};
//! use engagement_scheduler::infra::{InMemoryDelivery, InMemoryStateStore, RecordingClassifier};
//! use engagement_scheduler::runtime::run_address_turn;
//! use engagement_scheduler::util::TurnClock;
//!
//! let config = SchedulerConfig::new("home-42").with_time_threshold_secs(1800);
//! let classifier = RecordingClassifier::new();
//! let store = InMemoryStateStore::new();
//! let mut orchestrator = SchedulerOrchestrator::new(
//!     config,
//!     classifier.clone(),
//!     InMemoryDelivery::new(),
//!     ArgmaxCalculator,
//! );
//!
//! let clock = TurnClock::now(0);
//! run_address_turn(&store, &mut orchestrator, "messages_updated", batch, clock).await?;
//!
//! // Later, when the classifier calls back:
//! run_address_turn(&store, &mut orchestrator, "ai", callback, TurnClock::now(0)).await?;
//! ```
//!
//! For complete examples, see `tests/scheduler_cycle_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Messages, scores, the priority buffer and the orchestrator.
pub mod core;
/// Configuration models for the scheduler and its backends.
pub mod config;
/// Builders to construct scheduler components from configuration.
pub mod builders;
/// Infrastructure adapters for state, delivery and classification.
pub mod infra;
/// Host-facing event models and the per-turn driver.
pub mod runtime;
/// Shared utilities.
pub mod util;
