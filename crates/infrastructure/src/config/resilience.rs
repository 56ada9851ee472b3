//! Chaos configuration: injection rates and the synthetic fault they inject.

use std::time::Duration;

use domain::{DomainError, HttpStatus, Probability};
use serde::{Deserialize, Serialize};

use super::default_true;
use crate::chaos::FaultPolicy;

// ==============================
// Chaos Configuration
// ==============================

/// Chaos injection settings shared by the standard pipelines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaosAppConfig {
    /// Master switch; when false no pipeline carries an injector
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Outcome injection rate for the retry pipeline (default: 0.75)
    #[serde(default = "default_retry_outcome_rate")]
    pub retry_outcome_rate: f64,

    /// Latency injection rate for the timeout pipeline (default: 0.5)
    #[serde(default = "default_latency_rate")]
    pub latency_rate: f64,

    /// Injected latency in milliseconds (default: 3000)
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Outcome injection rate for the timeout pipeline (default: 0.5)
    #[serde(default = "default_timeout_outcome_rate")]
    pub timeout_outcome_rate: f64,

    /// Outcome injection rate for the circuit breaker pipeline (default: 0.8)
    #[serde(default = "default_circuit_breaker_outcome_rate")]
    pub circuit_breaker_outcome_rate: f64,

    /// Outcome injection rate for the fallback pipeline (default: 0.8)
    #[serde(default = "default_fallback_outcome_rate")]
    pub fallback_outcome_rate: f64,

    /// Status carried by injected outcomes (default: 500)
    #[serde(default = "default_injected_status")]
    pub injected_status: u16,
}

const fn default_retry_outcome_rate() -> f64 {
    0.75
}

const fn default_latency_rate() -> f64 {
    0.5
}

const fn default_latency_ms() -> u64 {
    3_000
}

const fn default_timeout_outcome_rate() -> f64 {
    0.5
}

const fn default_circuit_breaker_outcome_rate() -> f64 {
    0.8
}

const fn default_fallback_outcome_rate() -> f64 {
    0.8
}

const fn default_injected_status() -> u16 {
    500
}

impl Default for ChaosAppConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            retry_outcome_rate: default_retry_outcome_rate(),
            latency_rate: default_latency_rate(),
            latency_ms: default_latency_ms(),
            timeout_outcome_rate: default_timeout_outcome_rate(),
            circuit_breaker_outcome_rate: default_circuit_breaker_outcome_rate(),
            fallback_outcome_rate: default_fallback_outcome_rate(),
            injected_status: default_injected_status(),
        }
    }
}

impl ChaosAppConfig {
    /// Configuration with every injector switched off
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// # Errors
    ///
    /// Returns [`DomainError::InvalidStatusCode`] when not a valid HTTP status.
    pub fn injected_status(&self) -> Result<HttpStatus, DomainError> {
        HttpStatus::new(self.injected_status)
    }

    /// Latency policy for the timeout pipeline
    ///
    /// # Errors
    ///
    /// Returns an error when `latency_rate` is not a probability.
    pub fn latency_policy(&self) -> Result<FaultPolicy, DomainError> {
        Ok(FaultPolicy::latency(Probability::new(self.latency_rate)?, self.latency())
            .with_enabled(self.enabled))
    }

    /// Outcome policy injecting [`Self::injected_status`] at `rate`
    ///
    /// # Errors
    ///
    /// Returns an error when `rate` is not a probability or the status is invalid.
    pub fn outcome_policy(&self, rate: f64) -> Result<FaultPolicy, DomainError> {
        Ok(
            FaultPolicy::status(Probability::new(rate)?, self.injected_status()?)
                .with_enabled(self.enabled),
        )
    }

    /// # Errors
    ///
    /// Returns the first rate or status that is out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, rate) in [
            ("retry_outcome_rate", self.retry_outcome_rate),
            ("latency_rate", self.latency_rate),
            ("timeout_outcome_rate", self.timeout_outcome_rate),
            ("circuit_breaker_outcome_rate", self.circuit_breaker_outcome_rate),
            ("fallback_outcome_rate", self.fallback_outcome_rate),
        ] {
            if Probability::new(rate).is_err() {
                return Err(DomainError::invalid_configuration(format!(
                    "chaos.{name} must be between 0.0 and 1.0, got {rate}"
                )));
            }
        }
        self.injected_status()?;
        Ok(())
    }
}
