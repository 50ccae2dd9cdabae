//! One host turn: load state, handle an event, persist state.

use crate::core::{
    Classifier, DeliveryService, PriorityCalculator, SchedulerError, SchedulerOrchestrator,
    SchedulerState, StateStore, TurnOutcome,
};
use crate::runtime::InboundEvent;
use crate::util::clock::TurnClock;

/// Route an event to its handler.
pub async fn dispatch<C, D, K>(
    orchestrator: &mut SchedulerOrchestrator<C, D, K>,
    event: InboundEvent,
    clock: TurnClock,
) -> Result<TurnOutcome, SchedulerError>
where
    C: Classifier,
    D: DeliveryService,
    K: PriorityCalculator,
{
    match event {
        InboundEvent::MessagesUpdated(batch) => orchestrator.messages_updated(&batch, clock).await,
        InboundEvent::ClassifierResponse(callback) => orchestrator.ai(callback, clock).await,
    }
}

/// Run one turn against persisted state.
///
/// State is saved even when the handler fails, so an aborted or partially
/// failed cycle never loses the previous schedule. An unreadable state
/// document is logged and replaced by a fresh state.
pub async fn run_turn<S, C, D, K>(
    store: &S,
    orchestrator: &mut SchedulerOrchestrator<C, D, K>,
    event: InboundEvent,
    clock: TurnClock,
) -> Result<TurnOutcome, SchedulerError>
where
    S: StateStore + ?Sized,
    C: Classifier,
    D: DeliveryService,
    K: PriorityCalculator,
{
    let location_id = orchestrator.config().location_id.clone();
    let state = match store.load(&location_id) {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(location = %location_id, "discarding unreadable state: {e}");
            SchedulerState::default()
        }
    };
    orchestrator.load_state(state);

    tracing::debug!(location = %location_id, address = event.address(), "turn started");
    let outcome = dispatch(orchestrator, event, clock).await;
    store.save(&location_id, &orchestrator.state())?;
    outcome
}

/// Run one turn for a raw address/payload pair. Unknown addresses are
/// ignored without touching state.
pub async fn run_address_turn<S, C, D, K>(
    store: &S,
    orchestrator: &mut SchedulerOrchestrator<C, D, K>,
    address: &str,
    payload: serde_json::Value,
    clock: TurnClock,
) -> Result<TurnOutcome, SchedulerError>
where
    S: StateStore + ?Sized,
    C: Classifier,
    D: DeliveryService,
    K: PriorityCalculator,
{
    match InboundEvent::from_address(address, payload)? {
        Some(event) => run_turn(store, orchestrator, event, clock).await,
        None => {
            tracing::debug!(address, "ignoring unknown address");
            Ok(TurnOutcome::Ignored)
        }
    }
}
