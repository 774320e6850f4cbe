use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for serialization passes.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) entities: BTreeMap<String, EntityCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Passes
    pub passes_started: u64,
    pub passes_failed: u64,

    // Plans
    pub plans_built: u64,

    // Lazy values
    pub proxies_loaded: u64,
    pub proxies_suppressed: u64,
    pub collections_loaded: u64,
    pub collections_suppressed: u64,
    pub load_failures: u64,

    // Relationships
    pub back_references_skipped: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityCounters {
    pub entities_written: u64,
    pub plans_built: u64,
    pub back_references_skipped: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: EventOps,
    pub entity_counters: Vec<(String, EntityCounters)>,
}

impl EventReport {
    #[must_use]
    pub fn entity(&self, path: &str) -> Option<&EntityCounters> {
        self.entity_counters
            .iter()
            .find(|(entity, _)| entity == path)
            .map(|(_, counters)| counters)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Bump the counters of one entity.
pub(crate) fn with_entity_mut(path: &str, f: impl FnOnce(&mut EntityCounters)) {
    with_state_mut(|m| f(m.entities.entry(path.to_string()).or_default()));
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        counters: m.ops.clone(),
        entity_counters: m
            .entities
            .iter()
            .map(|(path, counters)| (path.clone(), counters.clone()))
            .collect(),
    })
}
