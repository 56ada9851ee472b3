//! Infrastructure adapters
//!
//! Concrete resilience strategies and the adapters behind the application
//! ports (event sinks, random sources).

mod circuit_breaker;
mod event_sinks;
mod fallback;
mod random_sources;
mod timeout;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState, WindowSnapshot};
pub use event_sinks::{EVENTS_COUNTER, InMemoryEventSink, TracingEventSink};
pub use fallback::{FallbackConfig, FallbackStrategy, OutcomeGenerator};
pub use random_sources::{ScriptedRandomSource, SeededRandomSource, ThreadRandomSource};
pub use timeout::{TimeoutConfig, TimeoutStrategy};
