//! Probability value object
//!
//! Used for chaos injection rates and circuit breaker failure ratios.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A probability in `0.0..=1.0`
///
/// # Examples
///
/// ```
/// use domain::value_objects::Probability;
///
/// let rate = Probability::new(0.75).expect("valid rate");
/// assert!(rate.admits(0.5));
/// assert!(!rate.admits(0.8));
/// assert!(Probability::new(1.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Never
    pub const NEVER: Self = Self(0.0);
    /// Always
    pub const ALWAYS: Self = Self(1.0);

    /// Create a validated probability
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidProbability` for NaN or values outside `0.0..=1.0`.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidProbability(value))
        }
    }

    /// Raw value
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Whether a uniform draw from `[0, 1)` falls under this probability
    #[must_use]
    pub fn admits(&self, draw: f64) -> bool {
        draw < self.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::NEVER
    }
}

impl TryFrom<f64> for Probability {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
