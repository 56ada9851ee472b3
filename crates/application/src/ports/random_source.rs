//! Random source port
//!
//! Chaos injection draws from this port instead of a global generator, so
//! tests can script exactly which calls get a fault.

#[cfg(test)]
use mockall::automock;

/// Uniform random numbers in `[0, 1)`
#[cfg_attr(test, automock)]
pub trait RandomSource: Send + Sync {
    fn next_f64(&self) -> f64;
}
