//! Application layer - pipeline composition and execution
//!
//! Defines the ports a resilience strategy plugs into, the per-call
//! [`ResilienceContext`], the pipeline executor and the named pipeline
//! registry. Concrete strategies live in the infrastructure layer.

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod predicates;
pub mod resilience_context;
pub mod services;

pub use error::ApplicationError;
pub use pipeline::{ResiliencePipeline, ResiliencePipelineBuilder};
pub use ports::*;
pub use predicates::OutcomePredicate;
pub use resilience_context::{AttemptCounter, OperationContext, ResilienceContext};
pub use services::*;
