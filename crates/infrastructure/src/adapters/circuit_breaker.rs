//! Circuit breaker strategy
//!
//! Stops calling a downstream dependency that is deemed unhealthy.
//!
//! # States
//!
//! - **Closed**: Normal operation. Every completed call is sampled into a
//!   sliding time window. Once the window holds at least
//!   `minimum_throughput` samples and the failure ratio reaches
//!   `failure_ratio`, the circuit opens.
//! - **Open**: Calls fail fast with `CircuitOpen` until the break elapses.
//! - **Half-Open**: The first caller after the break becomes the probe; all
//!   concurrent callers are rejected. A successful probe closes the circuit,
//!   a failed one reopens it for a fresh break.
//!
//! One breaker instance guards one downstream dependency and is shared by
//! every execution of the pipelines it is part of.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use application::predicates::{self, OutcomePredicate};
use application::{EventSink, Next, ResilienceContext, ResilienceStrategy};
use async_trait::async_trait;
use domain::{DomainError, Failure, Outcome, ResilienceEvent};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for a circuit breaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Samples required in the window before the ratio is evaluated (default: 3)
    #[serde(default = "default_minimum_throughput")]
    pub minimum_throughput: u32,

    /// Failure ratio at or above which the circuit opens (default: 1.0)
    #[serde(default = "default_failure_ratio")]
    pub failure_ratio: f64,

    /// Length of the sliding sample window in milliseconds (default: 30s)
    #[serde(default = "default_sampling_duration_ms")]
    pub sampling_duration_ms: u64,

    /// How long the circuit stays open in milliseconds (default: 10s)
    #[serde(default = "default_break_duration_ms")]
    pub break_duration_ms: u64,
}

const fn default_minimum_throughput() -> u32 {
    3
}

const fn default_failure_ratio() -> f64 {
    1.0
}

const fn default_sampling_duration_ms() -> u64 {
    30_000
}

const fn default_break_duration_ms() -> u64 {
    10_000
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            minimum_throughput: default_minimum_throughput(),
            failure_ratio: default_failure_ratio(),
            sampling_duration_ms: default_sampling_duration_ms(),
            break_duration_ms: default_break_duration_ms(),
        }
    }
}

impl CircuitBreakerConfig {
    /// Creates a custom configuration
    #[must_use]
    pub fn custom(
        minimum_throughput: u32,
        failure_ratio: f64,
        sampling_duration: Duration,
        break_duration: Duration,
    ) -> Self {
        Self {
            minimum_throughput,
            failure_ratio,
            sampling_duration_ms: u64::try_from(sampling_duration.as_millis()).unwrap_or(u64::MAX),
            break_duration_ms: u64::try_from(break_duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub const fn sampling_duration(&self) -> Duration {
        Duration::from_millis(self.sampling_duration_ms)
    }

    #[must_use]
    pub const fn break_duration(&self) -> Duration {
        Duration::from_millis(self.break_duration_ms)
    }

    /// Check the thresholds are usable
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfiguration`] for a ratio outside
    /// `0.0..=1.0` or a zero window/break duration.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.failure_ratio) {
            return Err(DomainError::invalid_configuration(format!(
                "circuit_breaker.failure_ratio must be between 0.0 and 1.0, got {}",
                self.failure_ratio
            )));
        }
        if self.sampling_duration_ms == 0 {
            return Err(DomainError::invalid_configuration(
                "circuit_breaker.sampling_duration_ms must be greater than zero",
            ));
        }
        if self.break_duration_ms == 0 {
            return Err(DomainError::invalid_configuration(
                "circuit_breaker.break_duration_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// State of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, requests pass through
    Closed,
    /// Dependency is unhealthy, requests fail fast
    Open,
    /// Testing whether the dependency has recovered
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Samples currently inside the sliding window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowSnapshot {
    pub samples: usize,
    pub failures: usize,
}

impl WindowSnapshot {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn failure_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.failures as f64 / self.samples as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    at: Instant,
    failed: bool,
}

/// Internal state tracking
#[derive(Debug)]
struct BreakerState {
    circuit: CircuitState,
    window: VecDeque<Sample>,
    broken_until: Option<Instant>,
    probe_in_flight: bool,
}

impl BreakerState {
    const fn new() -> Self {
        Self {
            circuit: CircuitState::Closed,
            window: VecDeque::new(),
            broken_until: None,
            probe_in_flight: false,
        }
    }

    fn prune(&mut self, now: Instant, sampling: Duration) {
        while self
            .window
            .front()
            .is_some_and(|s| now.saturating_duration_since(s.at) >= sampling)
        {
            self.window.pop_front();
        }
    }

    fn snapshot(&self, now: Instant, sampling: Duration) -> WindowSnapshot {
        let live = self
            .window
            .iter()
            .filter(|s| now.saturating_duration_since(s.at) < sampling);
        let (samples, failures) = live.fold((0, 0), |(n, f), s| (n + 1, f + usize::from(s.failed)));
        WindowSnapshot { samples, failures }
    }

    fn trip(&mut self, now: Instant, break_duration: Duration) {
        self.circuit = CircuitState::Open;
        self.broken_until = Some(now + break_duration);
        self.window.clear();
        self.probe_in_flight = false;
    }

    fn close(&mut self) {
        self.circuit = CircuitState::Closed;
        self.broken_until = None;
        self.window.clear();
        self.probe_in_flight = false;
    }
}

/// How a call was let through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Permit {
    Closed,
    Probe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Opened,
    HalfOpened,
    Closed,
}

/// Frees the half-open probe slot if the probe never reports back
struct ProbeGuard<'a> {
    state: &'a Mutex<BreakerState>,
    armed: bool,
}

impl ProbeGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock();
            if state.circuit == CircuitState::HalfOpen {
                state.probe_in_flight = false;
            }
        }
    }
}

/// Circuit breaker guarding one downstream dependency
pub struct CircuitBreaker<T: Send + 'static> {
    name: String,
    config: CircuitBreakerConfig,
    is_failure: OutcomePredicate<T>,
    state: Mutex<BreakerState>,
    sink: Arc<dyn EventSink>,
}

impl<T: Send + 'static> fmt::Debug for CircuitBreaker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> CircuitBreaker<T> {
    /// Creates a circuit breaker that counts every failure except cancellation
    pub fn new(
        name: impl Into<String>,
        config: CircuitBreakerConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            is_failure: predicates::any_failure(),
            state: Mutex::new(BreakerState::new()),
            sink,
        }
    }

    /// Replace the predicate deciding which outcomes count as failures
    #[must_use]
    pub fn with_failure_predicate(mut self, is_failure: OutcomePredicate<T>) -> Self {
        self.is_failure = is_failure;
        self
    }

    /// Returns the name of this circuit breaker
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Returns the current state of the circuit breaker
    ///
    /// An open circuit whose break has elapsed reports `Open` until the next
    /// call turns it half-open.
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.state.lock().circuit
    }

    /// Samples currently counted in the sliding window
    #[must_use]
    pub fn window_snapshot(&self) -> WindowSnapshot {
        self.state
            .lock()
            .snapshot(Instant::now(), self.config.sampling_duration())
    }

    /// Force the circuit closed and forget all samples
    pub fn reset(&self) {
        let previous = {
            let mut state = self.state.lock();
            let previous = state.circuit;
            state.close();
            previous
        };

        if previous != CircuitState::Closed {
            info!(circuit = %self.name, previous = %previous, "Circuit manually reset to Closed");
            self.announce(&self.name, Transition::Closed);
        }
    }

    /// Decide whether a call may proceed
    fn try_acquire(&self, pipeline: &str) -> Option<Permit> {
        let now = Instant::now();
        let (permit, transition) = {
            let mut state = self.state.lock();
            match state.circuit {
                CircuitState::Closed => (Some(Permit::Closed), None),
                CircuitState::Open => {
                    if state.broken_until.is_some_and(|until| now >= until) {
                        state.circuit = CircuitState::HalfOpen;
                        state.probe_in_flight = true;
                        (Some(Permit::Probe), Some(Transition::HalfOpened))
                    } else {
                        (None, None)
                    }
                },
                CircuitState::HalfOpen => {
                    if state.probe_in_flight {
                        (None, None)
                    } else {
                        state.probe_in_flight = true;
                        (Some(Permit::Probe), None)
                    }
                },
            }
        };

        if let Some(transition) = transition {
            self.announce(pipeline, transition);
        }
        permit
    }

    /// Feed a completed call back into the state machine
    fn record(&self, pipeline: &str, permit: Permit, outcome: &Outcome<T>) {
        let now = Instant::now();

        if outcome.is_cancelled() {
            if permit == Permit::Probe {
                let mut state = self.state.lock();
                if state.circuit == CircuitState::HalfOpen {
                    state.probe_in_flight = false;
                }
            }
            return;
        }

        let failed = (self.is_failure)(outcome);
        let transition = {
            let mut state = self.state.lock();
            match permit {
                Permit::Closed if state.circuit == CircuitState::Closed => {
                    state.window.push_back(Sample { at: now, failed });
                    state.prune(now, self.config.sampling_duration());
                    let window = state.snapshot(now, self.config.sampling_duration());

                    if window.samples >= self.config.minimum_throughput as usize
                        && window.failure_ratio() >= self.config.failure_ratio
                    {
                        state.trip(now, self.config.break_duration());
                        Some(Transition::Opened)
                    } else {
                        None
                    }
                },
                Permit::Probe if state.circuit == CircuitState::HalfOpen => {
                    if failed {
                        state.trip(now, self.config.break_duration());
                        Some(Transition::Opened)
                    } else {
                        state.close();
                        Some(Transition::Closed)
                    }
                },
                // The circuit moved on while this call was in flight
                Permit::Closed | Permit::Probe => None,
            }
        };

        if let Some(transition) = transition {
            self.announce(pipeline, transition);
        }
    }

    fn announce(&self, pipeline: &str, transition: Transition) {
        let event = match transition {
            Transition::Opened => {
                warn!(
                    circuit = %self.name,
                    break_ms = self.config.break_duration_ms,
                    "Circuit transitioning to Open"
                );
                ResilienceEvent::CircuitOpened {
                    circuit: self.name.clone(),
                    break_duration: self.config.break_duration(),
                }
            },
            Transition::HalfOpened => {
                info!(circuit = %self.name, "Circuit transitioning from Open to HalfOpen");
                ResilienceEvent::CircuitHalfOpened {
                    circuit: self.name.clone(),
                }
            },
            Transition::Closed => {
                info!(circuit = %self.name, "Circuit transitioning to Closed");
                ResilienceEvent::CircuitClosed {
                    circuit: self.name.clone(),
                }
            },
        };
        self.sink.emit(pipeline, &event);
    }
}

#[async_trait]
impl<T: Send + 'static> ResilienceStrategy<T> for CircuitBreaker<T> {
    fn name(&self) -> &'static str {
        "circuit_breaker"
    }

    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T> {
        let Some(permit) = self.try_acquire(ctx.pipeline()) else {
            debug!(
                circuit = %self.name,
                pipeline = %ctx.pipeline(),
                "Circuit breaker preventing call to service"
            );
            return Outcome::Failure(Failure::circuit_open(&self.name));
        };

        let mut guard = ProbeGuard {
            state: &self.state,
            armed: permit == Permit::Probe,
        };
        let outcome = next.run(ctx).await;
        guard.disarm();

        self.record(ctx.pipeline(), permit, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use application::{NoopEventSink, OperationContext, ResiliencePipeline, operation_fn};
    use domain::{ErrorKind, HttpStatus};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::adapters::InMemoryEventSink;

    fn breaker(sink: Arc<dyn EventSink>) -> Arc<CircuitBreaker<u32>> {
        Arc::new(CircuitBreaker::new(
            "downstream",
            CircuitBreakerConfig::default(),
            sink,
        ))
    }

    fn pipeline(cb: &Arc<CircuitBreaker<u32>>) -> ResiliencePipeline<u32> {
        ResiliencePipeline::builder("circuit-breaker")
            .with_shared_strategy(cb.clone())
            .build()
    }

    fn failing() -> impl application::Operation<u32> {
        operation_fn(|_ctx: OperationContext| async {
            Outcome::Failure(Failure::unsuccessful(HttpStatus::INTERNAL_SERVER_ERROR))
        })
    }

    fn succeeding() -> impl application::Operation<u32> {
        operation_fn(|_ctx: OperationContext| async { Outcome::Success(7) })
    }

    #[test]
    fn config_default() {
        let config = CircuitBreakerConfig::default();
        assert_eq!(config.minimum_throughput, 3);
        assert!((config.failure_ratio - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.sampling_duration(), Duration::from_secs(30));
        assert_eq!(config.break_duration(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_custom() {
        let config = CircuitBreakerConfig::custom(
            5,
            0.5,
            Duration::from_secs(60),
            Duration::from_secs(20),
        );
        assert_eq!(config.minimum_throughput, 5);
        assert_eq!(config.sampling_duration_ms, 60_000);
        assert_eq!(config.break_duration_ms, 20_000);
    }

    #[test]
    fn config_custom_saturates_huge_durations() {
        let config = CircuitBreakerConfig::custom(1, 1.0, Duration::MAX, Duration::MAX);
        assert_eq!(config.sampling_duration_ms, u64::MAX);
        assert_eq!(config.break_duration_ms, u64::MAX);
    }

    #[test]
    fn config_validation_rejects_bad_values() {
        let mut config = CircuitBreakerConfig::default();
        config.failure_ratio = 1.5;
        assert!(config.validate().is_err());

        let mut config = CircuitBreakerConfig::default();
        config.break_duration_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn circuit_state_display() {
        assert_eq!(format!("{}", CircuitState::Closed), "closed");
        assert_eq!(format!("{}", CircuitState::Open), "open");
        assert_eq!(format!("{}", CircuitState::HalfOpen), "half-open");
    }

    #[test]
    fn circuit_breaker_debug() {
        let cb = breaker(Arc::new(NoopEventSink));
        let debug = format!("{cb:?}");
        assert!(debug.contains("CircuitBreaker"));
        assert!(debug.contains("downstream"));
    }

    #[tokio::test(start_paused = true)]
    async fn opens_after_minimum_throughput_of_failures() {
        let sink = Arc::new(InMemoryEventSink::new());
        let cb = breaker(sink.clone());
        let pipeline = pipeline(&cb);
        let op = failing();

        for _ in 0..2 {
            pipeline.execute(&op, CancellationToken::new()).await;
        }
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.window_snapshot(), WindowSnapshot { samples: 2, failures: 2 });

        pipeline.execute(&op, CancellationToken::new()).await;
        assert_eq!(cb.state(), CircuitState::Open);
        assert_eq!(cb.window_snapshot().samples, 0);
        assert_eq!(sink.names(), vec!["circuit_opened"]);
    }

    #[tokio::test(start_paused = true)]
    async fn open_circuit_rejects_without_calling_downstream() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }

        let calls = Arc::new(AtomicU32::new(0));
        let counted = Arc::clone(&calls);
        let op = operation_fn(move |_ctx: OperationContext| {
            counted.fetch_add(1, Ordering::SeqCst);
            async { Outcome::Success(1) }
        });

        let outcome = pipeline.execute(&op, CancellationToken::new()).await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CircuitOpen));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_window_does_not_trip_at_full_ratio() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);

        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
            pipeline.execute(&failing(), CancellationToken::new()).await;
            pipeline.execute(&succeeding(), CancellationToken::new()).await;
            if cb.state() == CircuitState::Open {
                break;
            }
        }
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn old_samples_leave_the_window() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);

        pipeline.execute(&failing(), CancellationToken::new()).await;
        pipeline.execute(&failing(), CancellationToken::new()).await;
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(cb.window_snapshot().samples, 0);

        pipeline.execute(&failing(), CancellationToken::new()).await;
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_after_break_closes_on_success() {
        let sink = Arc::new(InMemoryEventSink::new());
        let cb = breaker(sink.clone());
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }

        tokio::time::advance(Duration::from_secs(5)).await;
        let outcome = pipeline.execute(&succeeding(), CancellationToken::new()).await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CircuitOpen));

        tokio::time::advance(Duration::from_secs(5)).await;
        let outcome = pipeline.execute(&succeeding(), CancellationToken::new()).await;
        assert_eq!(outcome, Outcome::Success(7));
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(
            sink.names(),
            vec!["circuit_opened", "circuit_half_opened", "circuit_closed"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_probe_reopens_for_a_fresh_break() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }

        tokio::time::advance(Duration::from_secs(10)).await;
        pipeline.execute(&failing(), CancellationToken::new()).await;
        assert_eq!(cb.state(), CircuitState::Open);

        tokio::time::advance(Duration::from_secs(9)).await;
        let outcome = pipeline.execute(&succeeding(), CancellationToken::new()).await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::CircuitOpen));

        tokio::time::advance(Duration::from_secs(1)).await;
        let outcome = pipeline.execute(&succeeding(), CancellationToken::new()).await;
        assert!(outcome.is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_outcomes_are_not_sampled() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);
        let op = operation_fn(|_ctx: OperationContext| async {
            Outcome::<u32>::Failure(Failure::cancelled())
        });

        for _ in 0..5 {
            pipeline.execute(&op, CancellationToken::new()).await;
        }
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.window_snapshot().samples, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_probe_releases_the_slot() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }
        tokio::time::advance(Duration::from_secs(10)).await;

        let slow = operation_fn(|_ctx: OperationContext| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Outcome::Success(1)
        });
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });
        let outcome = pipeline.execute(&slow, token).await;
        assert!(outcome.is_cancelled());
        assert_eq!(cb.state(), CircuitState::HalfOpen);

        let outcome = pipeline.execute(&succeeding(), CancellationToken::new()).await;
        assert!(outcome.is_success());
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_lets_one_concurrent_call_through() {
        let cb = breaker(Arc::new(NoopEventSink));
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }
        tokio::time::advance(Duration::from_secs(10)).await;

        let calls = Arc::new(AtomicU32::new(0));
        let counted = Arc::clone(&calls);
        let slow = operation_fn(move |_ctx: OperationContext| {
            counted.fetch_add(1, Ordering::SeqCst);
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Outcome::Success(1)
            }
        });

        let outcomes = futures::future::join_all(
            (0..4).map(|_| pipeline.execute(&slow, CancellationToken::new())),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 1);
        assert_eq!(
            outcomes
                .iter()
                .filter(|o| o.error_kind() == Some(ErrorKind::CircuitOpen))
                .count(),
            3
        );
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_forces_closed() {
        let sink = Arc::new(InMemoryEventSink::new());
        let cb = breaker(sink.clone());
        let pipeline = pipeline(&cb);
        for _ in 0..3 {
            pipeline.execute(&failing(), CancellationToken::new()).await;
        }

        cb.reset();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(sink.names(), vec!["circuit_opened", "circuit_closed"]);

        cb.reset();
        assert_eq!(sink.len(), 2);
    }
}
