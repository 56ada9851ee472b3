//! Failure classification
//!
//! The closed set of reasons a call attempt can fail.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a call attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Connection-level failure; no result was received
    TransportFailure,
    /// Cancellation requested by the caller
    Cancelled,
    /// The attempt exceeded its time budget
    Timeout,
    /// A result was received but classified as failed (e.g. HTTP 5xx)
    UnsuccessfulResult,
    /// The circuit breaker rejected the call without invoking downstream
    CircuitOpen,
}

impl ErrorKind {
    /// Stable snake_case identifier, used in diagnostic attributes
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TransportFailure => "transport_failure",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
            Self::UnsuccessfulResult => "unsuccessful_result",
            Self::CircuitOpen => "circuit_open",
        }
    }

    /// Caller cancellation is terminal and passes straight through every strategy
    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(ErrorKind::TransportFailure.to_string(), "transport_failure");
        assert_eq!(ErrorKind::CircuitOpen.to_string(), "circuit_open");
        assert_eq!(
            ErrorKind::UnsuccessfulResult.to_string(),
            "unsuccessful_result"
        );
    }

    #[test]
    fn only_cancelled_is_cancellation() {
        assert!(ErrorKind::Cancelled.is_cancellation());
        assert!(!ErrorKind::Timeout.is_cancellation());
        assert!(!ErrorKind::TransportFailure.is_cancellation());
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::Timeout).unwrap();
        assert_eq!(json, "\"timeout\"");
        let parsed: ErrorKind = serde_json::from_str("\"circuit_open\"").unwrap();
        assert_eq!(parsed, ErrorKind::CircuitOpen);
    }
}
