//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Call failures are never errors here: they travel as [`domain::Outcome`]
/// values. These variants cover misuse of the pipeline surface itself.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No pipeline registered under this name
    #[error("Unknown pipeline: {0}")]
    UnknownPipeline(String),

    /// A pipeline with this name is already registered
    #[error("Pipeline already registered: {0}")]
    DuplicatePipeline(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Whether the error was caused by the caller's input rather than setup
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::UnknownPipeline(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pipeline_is_caller_error() {
        let err = ApplicationError::UnknownPipeline("nope".to_string());
        assert!(err.is_caller_error());
        assert_eq!(err.to_string(), "Unknown pipeline: nope");
    }

    #[test]
    fn domain_errors_convert() {
        let err: ApplicationError = DomainError::InvalidStatusCode(42).into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(!err.is_caller_error());
    }
}
