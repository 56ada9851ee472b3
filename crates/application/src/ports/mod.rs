//! Port definitions for application layer
//!
//! Ports are interfaces that define how the pipeline interacts with the code
//! around it. Adapters in the infrastructure layer implement these ports.

mod event_sink;
mod operation;
mod random_source;
mod resilience_strategy;

pub use event_sink::{EventSink, NoopEventSink};
#[cfg(test)]
pub use event_sink::MockEventSink;
pub use operation::{Operation, OperationFn, operation_fn};
pub use random_source::RandomSource;
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use resilience_strategy::{Next, ResilienceStrategy};
