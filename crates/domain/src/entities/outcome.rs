//! Outcome of a single call attempt
//!
//! An [`Outcome`] is produced by the user operation or synthesized by a
//! strategy (fallback, chaos injection, circuit rejection). Strategies never
//! mutate an outcome; they either pass it through or replace it.
//!
//! # Examples
//!
//! ```
//! use domain::{ErrorKind, Failure, HttpStatus, Outcome};
//!
//! let ok: Outcome<u32> = Outcome::Success(7);
//! assert!(ok.is_success());
//!
//! let failed: Outcome<u32> = Outcome::Failure(Failure::unsuccessful(HttpStatus::SERVICE_UNAVAILABLE));
//! assert_eq!(failed.error_kind(), Some(ErrorKind::UnsuccessfulResult));
//! assert!(failed.failure().is_some_and(Failure::is_transient));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_objects::{ErrorKind, HttpStatus};

/// Failure half of an [`Outcome`]
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
pub struct Failure {
    kind: ErrorKind,
    detail: String,
    status: Option<HttpStatus>,
}

impl Failure {
    /// Create a failure of the given kind
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            status: None,
        }
    }

    /// Attach the status of the received (or simulated) response
    #[must_use]
    pub const fn with_status(mut self, status: HttpStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Connection-level failure
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportFailure, detail)
    }

    /// Attempt exceeded `after`
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("attempt timed out after {}ms", after.as_millis()),
        )
    }

    /// Caller cancelled the call
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "call cancelled by caller")
    }

    /// Circuit `circuit` is rejecting calls
    pub fn circuit_open(circuit: &str) -> Self {
        Self::new(
            ErrorKind::CircuitOpen,
            format!("circuit '{circuit}' is open: downstream is temporarily unavailable"),
        )
    }

    /// A received result classified as failed
    pub fn unsuccessful(status: HttpStatus) -> Self {
        Self::new(ErrorKind::UnsuccessfulResult, format!("HTTP {status}")).with_status(status)
    }

    /// Failure classification
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable detail
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Status of the response this failure was derived from, if any
    #[must_use]
    pub const fn status(&self) -> Option<HttpStatus> {
        self.status
    }

    /// Transport failures, timeouts, and unsuccessful results with a transient status
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ErrorKind::TransportFailure | ErrorKind::Timeout => true,
            ErrorKind::UnsuccessfulResult => self.status.is_some_and(|s| s.is_transient()),
            ErrorKind::Cancelled | ErrorKind::CircuitOpen => false,
        }
    }

    /// A server-error status (5xx) or any transport failure
    #[must_use]
    pub fn is_server_error_or_transport(&self) -> bool {
        self.kind == ErrorKind::TransportFailure
            || self.status.is_some_and(|s| s.is_server_error())
    }
}

/// Tagged result of one call attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The attempt produced a value
    Success(T),
    /// The attempt failed
    Failure(Failure),
}

impl<T> Outcome<T> {
    /// Whether this is a success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is a failure
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Whether the caller cancelled the call
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.error_kind().is_some_and(|kind| kind.is_cancellation())
    }

    /// The success value, if any
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The failure, if any
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Failure classification, if this is a failure
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.failure().map(Failure::kind)
    }

    /// Map the success value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Convert into a standard `Result`
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, Failure>> for Outcome<T> {
    fn from(result: Result<T, Failure>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(failure) => Self::Failure(failure),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}
