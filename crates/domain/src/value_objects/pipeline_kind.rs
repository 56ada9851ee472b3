//! Named pipelines
//!
//! The standing set of pipelines a deployment exposes, each with a fixed
//! strategy order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// One of the standard named pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Retry with the transient predicate
    Retry,
    /// Retry around a chaos outcome injector
    RetryChaos,
    /// Timeout around latency and outcome injectors
    TimeoutLatencyChaos,
    /// Circuit breaker around a chaos outcome injector
    CircuitBreakerChaos,
    /// Fallback around a chaos outcome injector
    FallbackChaos,
}

impl PipelineKind {
    /// Every standard pipeline, in registration order
    pub const ALL: [Self; 5] = [
        Self::Retry,
        Self::RetryChaos,
        Self::TimeoutLatencyChaos,
        Self::CircuitBreakerChaos,
        Self::FallbackChaos,
    ];

    /// Registry name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::RetryChaos => "retry-chaos",
            Self::TimeoutLatencyChaos => "timeout-latency-chaos",
            Self::CircuitBreakerChaos => "circuit-breaker-chaos",
            Self::FallbackChaos => "fallback-chaos",
        }
    }

    /// Human-readable strategy order, outer to inner
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Retry => "retry(3, 1s/2s/4s, transient)",
            Self::RetryChaos => "retry(3, 1s/2s/4s) -> chaos outcome(0.75, 500)",
            Self::TimeoutLatencyChaos => {
                "timeout(1s) -> chaos latency(0.5, 3s) -> chaos outcome(0.5, 500)"
            },
            Self::CircuitBreakerChaos => {
                "circuit breaker(3, 1.0, 30s, 10s) -> chaos outcome(0.8, 500)"
            },
            Self::FallbackChaos => "fallback(5xx or transport -> 200) -> chaos outcome(0.8, 500)",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::UnknownPipelineKind(s.to_string()))
    }
}
