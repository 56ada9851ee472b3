//! Domain layer for Bulwark
//!
//! Contains the vocabulary of the resilience pipeline: call outcomes, failure
//! classification, HTTP status semantics, diagnostic events and domain errors.
//! This layer has no async or I/O dependencies.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
