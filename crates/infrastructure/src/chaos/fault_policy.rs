//! Fault policy definitions for chaos engineering.
//!
//! Defines the faults an injector can produce and how often.

use std::time::Duration;

use application::RandomSource;
use domain::{ErrorKind, Failure, HttpStatus, Probability};
use serde::{Deserialize, Serialize};

/// Types of faults that can be injected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
pub enum FaultType {
    /// Wait before calling downstream; the call itself still happens
    Latency(Duration),

    /// Return a synthetic failure instead of calling downstream
    Outcome {
        kind: ErrorKind,
        status: Option<HttpStatus>,
        detail: String,
    },
}

impl FaultType {
    /// Injected result with the given status
    pub fn status(status: HttpStatus) -> Self {
        Self::Outcome {
            kind: ErrorKind::UnsuccessfulResult,
            status: Some(status),
            detail: format!("chaos: injected HTTP {status}"),
        }
    }

    /// The failure an outcome fault returns
    #[must_use]
    pub fn failure(&self) -> Option<Failure> {
        match self {
            Self::Latency(_) => None,
            Self::Outcome {
                kind,
                status,
                detail,
            } => {
                let failure = Failure::new(*kind, detail.clone());
                Some(match status {
                    Some(status) => failure.with_status(*status),
                    None => failure,
                })
            },
        }
    }

    /// Short label used in strategy names and logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Latency(_) => "chaos_latency",
            Self::Outcome { .. } => "chaos_outcome",
        }
    }
}

/// Policy for fault injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultPolicy {
    /// Whether fault injection is enabled
    pub enabled: bool,

    /// Probability of injecting on each call
    pub injection_rate: Probability,

    /// Fault to inject
    pub fault: FaultType,
}

impl FaultPolicy {
    /// Inject `latency` with probability `rate`
    pub const fn latency(rate: Probability, latency: Duration) -> Self {
        Self {
            enabled: true,
            injection_rate: rate,
            fault: FaultType::Latency(latency),
        }
    }

    /// Return a synthetic `status` result with probability `rate`
    pub fn status(rate: Probability, status: HttpStatus) -> Self {
        Self {
            enabled: true,
            injection_rate: rate,
            fault: FaultType::status(status),
        }
    }

    /// Return `fault` with probability `rate`
    pub const fn outcome(rate: Probability, fault: FaultType) -> Self {
        Self {
            enabled: true,
            injection_rate: rate,
            fault,
        }
    }

    /// Enable or disable the policy
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Draw once and decide whether to inject
    ///
    /// A disabled policy does not consume a draw.
    pub fn should_inject(&self, random: &dyn RandomSource) -> bool {
        self.enabled && self.injection_rate.admits(random.next_f64())
    }
}
