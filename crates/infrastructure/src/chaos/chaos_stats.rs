//! Counters for fault injection statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Statistics about fault injection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosStats {
    /// Total number of calls processed
    pub total_calls: u64,
    /// Number of faults injected
    pub faults_injected: u64,
    /// Number of latency faults injected
    pub latency_injected: u64,
    /// Number of synthetic outcomes injected
    pub outcomes_injected: u64,
    /// Total latency added (milliseconds)
    pub total_latency_added_ms: u64,
}

impl ChaosStats {
    /// Calculate the actual fault rate
    #[allow(clippy::cast_precision_loss)]
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.total_calls as f64
        }
    }

    /// Calls that went through untouched
    pub const fn calls_skipped(&self) -> u64 {
        self.total_calls.saturating_sub(self.faults_injected)
    }
}

/// Lock-free counters shared by concurrent executions
#[derive(Debug, Default)]
pub struct ChaosCounters {
    total_calls: AtomicU64,
    latency_injected: AtomicU64,
    outcomes_injected: AtomicU64,
    total_latency_added_ms: AtomicU64,
}

impl ChaosCounters {
    pub const fn new() -> Self {
        Self {
            total_calls: AtomicU64::new(0),
            latency_injected: AtomicU64::new(0),
            outcomes_injected: AtomicU64::new(0),
            total_latency_added_ms: AtomicU64::new(0),
        }
    }

    /// Record a call being processed
    pub fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a latency injection
    pub fn record_latency(&self, latency: Duration) {
        self.latency_injected.fetch_add(1, Ordering::Relaxed);
        self.total_latency_added_ms.fetch_add(
            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
            Ordering::Relaxed,
        );
    }

    /// Record a synthetic outcome injection
    pub fn record_outcome(&self) {
        self.outcomes_injected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a copy of current statistics
    pub fn snapshot(&self) -> ChaosStats {
        let latency_injected = self.latency_injected.load(Ordering::Relaxed);
        let outcomes_injected = self.outcomes_injected.load(Ordering::Relaxed);
        ChaosStats {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            faults_injected: latency_injected + outcomes_injected,
            latency_injected,
            outcomes_injected,
            total_latency_added_ms: self.total_latency_added_ms.load(Ordering::Relaxed),
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.total_calls.store(0, Ordering::Relaxed);
        self.latency_injected.store(0, Ordering::Relaxed);
        self.outcomes_injected.store(0, Ordering::Relaxed);
        self.total_latency_added_ms.store(0, Ordering::Relaxed);
    }
}
