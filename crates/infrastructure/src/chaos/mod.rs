//! Chaos engineering strategies for resilience testing.
//!
//! - [`FaultInjector`]: a pipeline strategy that injects latency or a
//!   synthetic failure based on a [`FaultPolicy`]
//! - [`ChaosStats`]: counters describing what was injected
//! - [`TransientErrorOperation`]: an operation decorator that simulates a
//!   flaky upstream
//!
//! # Example
//!
//! ```ignore
//! use infrastructure::chaos::{FaultInjector, FaultPolicy};
//!
//! // Fail 80% of calls with HTTP 500 before they reach downstream
//! let injector = FaultInjector::new(
//!     FaultPolicy::status(Probability::new(0.8)?, HttpStatus::INTERNAL_SERVER_ERROR),
//!     random,
//!     sink,
//! );
//! ```

mod chaos_stats;
mod fault_injector;
mod fault_policy;
mod transient_errors;

pub use chaos_stats::{ChaosCounters, ChaosStats};
pub use fault_injector::FaultInjector;
pub use fault_policy::{FaultPolicy, FaultType};
pub use transient_errors::TransientErrorOperation;
