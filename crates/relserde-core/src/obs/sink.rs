//! Metrics sink boundary.
//!
//! Serialization logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    PassStart,
    PassFinish {
        ok: bool,
    },
    PlanBuilt {
        entity_path: &'static str,
        properties: usize,
    },
    EntityWritten {
        entity_path: &'static str,
    },
    ProxyLoaded,
    ProxySuppressed,
    CollectionLoaded,
    CollectionSuppressed,
    LoadFailed,
    BackReferenceSkipped {
        entity_path: &'static str,
        field: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// GlobalMetricsSink
/// Default sink feeding the thread-local counters.
///

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::PassStart => metrics::with_state_mut(|m| {
                m.ops.passes_started = m.ops.passes_started.saturating_add(1);
            }),
            MetricsEvent::PassFinish { ok } => {
                if !ok {
                    metrics::with_state_mut(|m| {
                        m.ops.passes_failed = m.ops.passes_failed.saturating_add(1);
                    });
                }
            }
            MetricsEvent::PlanBuilt { entity_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.plans_built = m.ops.plans_built.saturating_add(1);
                });
                metrics::with_entity_mut(entity_path, |entry| {
                    entry.plans_built = entry.plans_built.saturating_add(1);
                });
            }
            MetricsEvent::EntityWritten { entity_path } => {
                metrics::with_entity_mut(entity_path, |entry| {
                    entry.entities_written = entry.entities_written.saturating_add(1);
                });
            }
            MetricsEvent::ProxyLoaded => metrics::with_state_mut(|m| {
                m.ops.proxies_loaded = m.ops.proxies_loaded.saturating_add(1);
            }),
            MetricsEvent::ProxySuppressed => metrics::with_state_mut(|m| {
                m.ops.proxies_suppressed = m.ops.proxies_suppressed.saturating_add(1);
            }),
            MetricsEvent::CollectionLoaded => metrics::with_state_mut(|m| {
                m.ops.collections_loaded = m.ops.collections_loaded.saturating_add(1);
            }),
            MetricsEvent::CollectionSuppressed => metrics::with_state_mut(|m| {
                m.ops.collections_suppressed = m.ops.collections_suppressed.saturating_add(1);
            }),
            MetricsEvent::LoadFailed => metrics::with_state_mut(|m| {
                m.ops.load_failures = m.ops.load_failures.saturating_add(1);
            }),
            MetricsEvent::BackReferenceSkipped { entity_path, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.back_references_skipped = m.ops.back_references_skipped.saturating_add(1);
                });
                metrics::with_entity_mut(entity_path, |entry| {
                    entry.back_references_skipped = entry.back_references_skipped.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state for test and reporting plumbing.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
