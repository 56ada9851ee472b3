//! Event sink adapters
//!
//! - [`TracingEventSink`] turns each diagnostic event into a structured
//!   `tracing` event and bumps a `metrics` counter.
//! - [`InMemoryEventSink`] keeps events for later inspection.

use application::EventSink;
use domain::ResilienceEvent;
use parking_lot::Mutex;
use tracing::info;

/// Name of the counter incremented for every emitted event
pub const EVENTS_COUNTER: &str = "resilience_events_total";

/// Logs events through `tracing` and counts them through `metrics`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl TracingEventSink {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, pipeline: &str, event: &ResilienceEvent) {
        let attributes = event
            .attributes()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");

        info!(
            pipeline = %pipeline,
            event = event.name(),
            attributes = %attributes,
            "Resilience event"
        );
        metrics::counter!(
            EVENTS_COUNTER,
            "pipeline" => pipeline.to_string(),
            "event" => event.name()
        )
        .increment(1);
    }
}

/// Records every event in emission order
#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<(String, ResilienceEvent)>>,
}

impl InMemoryEventSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(pipeline, event)` pairs
    #[must_use]
    pub fn events(&self) -> Vec<(String, ResilienceEvent)> {
        self.events.lock().clone()
    }

    /// Recorded event names in emission order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|(_, e)| e.name()).collect()
    }

    /// Number of recorded events called `name`
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|(_, e)| e.name() == name)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Drop everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventSink {
    fn emit(&self, pipeline: &str, event: &ResilienceEvent) {
        self.events.lock().push((pipeline.to_string(), event.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::ErrorKind;

    use super::*;

    fn retry_event() -> ResilienceEvent {
        ResilienceEvent::RetryScheduled {
            attempt: 1,
            error_kind: ErrorKind::TransportFailure,
            delay: Duration::from_secs(1),
        }
    }

    #[test]
    fn in_memory_sink_records_in_order() {
        let sink = InMemoryEventSink::new();
        sink.emit("retry", &retry_event());
        sink.emit(
            "timeout",
            &ResilienceEvent::TimeoutElapsed {
                timeout: Duration::from_secs(1),
            },
        );

        assert_eq!(sink.names(), vec!["retry_attempt", "timeout"]);
        assert_eq!(sink.count("timeout"), 1);
        assert_eq!(sink.events()[0].0, "retry");

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn tracing_sink_emits_without_subscriber() {
        TracingEventSink::new().emit("retry", &retry_event());
    }
}
