//! Diagnostic event sink port
//!
//! Strategies report what they do through this port. The application layer
//! never owns a logger; infrastructure decides where events end up.

use domain::ResilienceEvent;
#[cfg(test)]
use mockall::automock;

/// Receiver of diagnostic events
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync {
    /// Record `event`, raised while executing `pipeline`
    ///
    /// Called inline on the execution path, so implementations must not block.
    fn emit(&self, pipeline: &str, event: &ResilienceEvent);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _pipeline: &str, _event: &ResilienceEvent) {}
}
