//! Diagnostic events emitted by resilience strategies
//!
//! Events are plain data. Emission goes through the application layer's
//! event sink port; the domain never logs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ErrorKind, HttpStatus};

/// A structured diagnostic event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResilienceEvent {
    /// A failed attempt will be retried after `delay`
    RetryScheduled {
        /// Number of the upcoming attempt (1 for the first retry)
        attempt: u32,
        error_kind: ErrorKind,
        delay: Duration,
    },
    /// The circuit started rejecting calls
    CircuitOpened {
        circuit: String,
        break_duration: Duration,
    },
    /// The break elapsed; one probe call is admitted
    CircuitHalfOpened { circuit: String },
    /// A probe succeeded and normal traffic resumes
    CircuitClosed { circuit: String },
    /// An attempt exceeded its time budget
    TimeoutElapsed { timeout: Duration },
    /// A failed outcome was replaced by a synthetic success
    FallbackTriggered {
        error_kind: ErrorKind,
        status: Option<HttpStatus>,
    },
    /// Latency was injected ahead of the downstream call
    ChaosLatencyInjected { latency: Duration },
    /// A synthetic failure replaced the downstream call
    ChaosOutcomeInjected {
        error_kind: ErrorKind,
        status: Option<HttpStatus>,
    },
}

impl ResilienceEvent {
    /// Stable event name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RetryScheduled { .. } => "retry_attempt",
            Self::CircuitOpened { .. } => "circuit_opened",
            Self::CircuitHalfOpened { .. } => "circuit_half_opened",
            Self::CircuitClosed { .. } => "circuit_closed",
            Self::TimeoutElapsed { .. } => "timeout",
            Self::FallbackTriggered { .. } => "fallback_triggered",
            Self::ChaosLatencyInjected { .. } => "chaos_latency_injected",
            Self::ChaosOutcomeInjected { .. } => "chaos_outcome_injected",
        }
    }

    /// Flat key/value attributes for sinks that cannot carry structured data
    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::RetryScheduled {
                attempt,
                error_kind,
                delay,
            } => vec![
                ("attempt", attempt.to_string()),
                ("error_kind", error_kind.to_string()),
                ("delay_ms", delay.as_millis().to_string()),
            ],
            Self::CircuitOpened {
                circuit,
                break_duration,
            } => vec![
                ("circuit", circuit.clone()),
                ("break_duration_ms", break_duration.as_millis().to_string()),
            ],
            Self::CircuitHalfOpened { circuit } | Self::CircuitClosed { circuit } => {
                vec![("circuit", circuit.clone())]
            },
            Self::TimeoutElapsed { timeout } => {
                vec![("timeout_ms", timeout.as_millis().to_string())]
            },
            Self::FallbackTriggered { error_kind, status }
            | Self::ChaosOutcomeInjected { error_kind, status } => {
                let mut attributes = vec![("error_kind", error_kind.to_string())];
                if let Some(status) = status {
                    attributes.push(("status", status.to_string()));
                }
                attributes
            },
            Self::ChaosLatencyInjected { latency } => {
                vec![("latency_ms", latency.as_millis().to_string())]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_event_carries_attempt_and_error() {
        let event = ResilienceEvent::RetryScheduled {
            attempt: 2,
            error_kind: ErrorKind::UnsuccessfulResult,
            delay: Duration::from_secs(2),
        };
        assert_eq!(event.name(), "retry_attempt");
        assert_eq!(
            event.attributes(),
            vec![
                ("attempt", "2".to_string()),
                ("error_kind", "unsuccessful_result".to_string()),
                ("delay_ms", "2000".to_string()),
            ]
        );
    }

    #[test]
    fn fallback_event_omits_missing_status() {
        let event = ResilienceEvent::FallbackTriggered {
            error_kind: ErrorKind::TransportFailure,
            status: None,
        };
        assert_eq!(event.attributes().len(), 1);

        let event = ResilienceEvent::FallbackTriggered {
            error_kind: ErrorKind::UnsuccessfulResult,
            status: Some(HttpStatus::INTERNAL_SERVER_ERROR),
        };
        assert!(event.attributes().contains(&("status", "500".to_string())));
    }

    #[test]
    fn timeout_event_name_and_duration() {
        let event = ResilienceEvent::TimeoutElapsed {
            timeout: Duration::from_secs(1),
        };
        assert_eq!(event.name(), "timeout");
        assert_eq!(event.attributes(), vec![("timeout_ms", "1000".to_string())]);
    }

    #[test]
    fn serializes_with_event_tag() {
        let event = ResilienceEvent::CircuitHalfOpened {
            circuit: "github".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "circuit_half_opened");
        assert_eq!(json["circuit"], "github");
    }
}
