//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    /// A probability or ratio fell outside `0.0..=1.0`
    #[error("Invalid probability: {0} (must be between 0.0 and 1.0)")]
    InvalidProbability(f64),

    /// A numeric value is not a valid HTTP status code
    #[error("Invalid HTTP status code: {0}")]
    InvalidStatusCode(u16),

    /// A pipeline name did not match any known pipeline kind
    #[error("Unknown pipeline kind: {0}")]
    UnknownPipelineKind(String),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}
