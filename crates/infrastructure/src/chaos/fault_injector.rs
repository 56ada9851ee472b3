//! Fault injector strategy for chaos engineering.
//!
//! A [`FaultInjector`] sits in a pipeline like any other strategy. On each
//! call it draws once from its random source and either passes through,
//! delays before passing through, or short-circuits with a synthetic failure.

use std::fmt;
use std::sync::Arc;

use application::{EventSink, Next, RandomSource, ResilienceContext, ResilienceStrategy};
use async_trait::async_trait;
use domain::{Failure, Outcome, ResilienceEvent};
use tracing::debug;

use super::{ChaosCounters, ChaosStats, FaultPolicy, FaultType};

/// Injects faults according to a [`FaultPolicy`]
pub struct FaultInjector {
    policy: FaultPolicy,
    random: Arc<dyn RandomSource>,
    sink: Arc<dyn EventSink>,
    counters: ChaosCounters,
}

impl FaultInjector {
    pub fn new(
        policy: FaultPolicy,
        random: Arc<dyn RandomSource>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            policy,
            random,
            sink,
            counters: ChaosCounters::new(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &FaultPolicy {
        &self.policy
    }

    /// Current injection statistics
    pub fn stats(&self) -> ChaosStats {
        self.counters.snapshot()
    }

    pub fn reset_stats(&self) {
        self.counters.reset();
    }
}

impl fmt::Debug for FaultInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaultInjector")
            .field("policy", &self.policy)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + 'static> ResilienceStrategy<T> for FaultInjector {
    fn name(&self) -> &'static str {
        self.policy.fault.label()
    }

    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T> {
        self.counters.record_call();
        if !self.policy.should_inject(self.random.as_ref()) {
            return next.run(ctx).await;
        }

        match &self.policy.fault {
            FaultType::Latency(latency) => {
                self.counters.record_latency(*latency);
                debug!(
                    pipeline = %ctx.pipeline(),
                    latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    "Injecting latency"
                );
                self.sink.emit(
                    ctx.pipeline(),
                    &ResilienceEvent::ChaosLatencyInjected { latency: *latency },
                );

                let cancellation = ctx.cancellation().clone();
                let cancelled = tokio::select! {
                    biased;
                    () = cancellation.cancelled() => true,
                    () = tokio::time::sleep(*latency) => false,
                };
                if cancelled {
                    return Outcome::Failure(Failure::cancelled());
                }
                next.run(ctx).await
            },
            fault @ FaultType::Outcome { .. } => {
                self.counters.record_outcome();
                let Some(failure) = fault.failure() else {
                    return next.run(ctx).await;
                };
                debug!(
                    pipeline = %ctx.pipeline(),
                    error_kind = %failure.kind(),
                    "Injecting synthetic outcome"
                );
                self.sink.emit(
                    ctx.pipeline(),
                    &ResilienceEvent::ChaosOutcomeInjected {
                        error_kind: failure.kind(),
                        status: failure.status(),
                    },
                );
                Outcome::Failure(failure)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use application::{OperationContext, ResiliencePipeline, operation_fn};
    use domain::{ErrorKind, HttpStatus, Probability};
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::adapters::{InMemoryEventSink, ScriptedRandomSource, SeededRandomSource};

    fn pipeline(
        policy: FaultPolicy,
        random: Arc<dyn RandomSource>,
        sink: &Arc<InMemoryEventSink>,
    ) -> (ResiliencePipeline<u32>, Arc<FaultInjector>) {
        let injector = Arc::new(FaultInjector::new(policy, random, sink.clone()));
        let pipeline = ResiliencePipeline::builder("chaos")
            .with_shared_strategy(injector.clone())
            .build();
        (pipeline, injector)
    }

    #[tokio::test]
    async fn passes_through_when_draw_misses() {
        let sink = Arc::new(InMemoryEventSink::new());
        let policy = FaultPolicy::status(
            Probability::new(0.5).unwrap(),
            HttpStatus::INTERNAL_SERVER_ERROR,
        );
        let (pipeline, injector) =
            pipeline(policy, Arc::new(ScriptedRandomSource::constant(0.9)), &sink);
        let op = operation_fn(|_: OperationContext| async { Outcome::Success(7) });

        let outcome = pipeline.execute(&op, CancellationToken::new()).await;

        assert_eq!(outcome.value(), Some(&7));
        assert!(sink.is_empty());
        assert_eq!(injector.stats().total_calls, 1);
        assert_eq!(injector.stats().faults_injected, 0);
    }

    #[tokio::test]
    async fn outcome_fault_skips_the_operation() {
        let sink = Arc::new(InMemoryEventSink::new());
        let calls = Arc::new(AtomicU32::new(0));
        let policy = FaultPolicy::status(Probability::ALWAYS, HttpStatus::INTERNAL_SERVER_ERROR);
        let (pipeline, injector) =
            pipeline(policy, Arc::new(ScriptedRandomSource::constant(0.0)), &sink);
        let counter = calls.clone();
        let op = operation_fn(move |_: OperationContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Outcome::Success(1) }
        });

        let outcome = pipeline.execute(&op, CancellationToken::new()).await;

        assert_eq!(outcome.error_kind(), Some(ErrorKind::UnsuccessfulResult));
        assert_eq!(
            outcome.failure().and_then(Failure::status),
            Some(HttpStatus::INTERNAL_SERVER_ERROR)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(sink.names(), vec!["chaos_outcome_injected"]);
        assert_eq!(injector.stats().outcomes_injected, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_fault_delays_then_calls() {
        let sink = Arc::new(InMemoryEventSink::new());
        let policy = FaultPolicy::latency(Probability::ALWAYS, Duration::from_secs(3));
        let (pipeline, injector) =
            pipeline(policy, Arc::new(ScriptedRandomSource::constant(0.0)), &sink);
        let op = operation_fn(|_: OperationContext| async { Outcome::Success(3) });

        let started = Instant::now();
        let outcome = pipeline.execute(&op, CancellationToken::new()).await;

        assert_eq!(outcome.value(), Some(&3));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(sink.names(), vec!["chaos_latency_injected"]);
        assert_eq!(injector.stats().total_latency_added_ms, 3_000);
    }

    #[tokio::test(start_paused = true)]
    async fn latency_fault_observes_cancellation() {
        let sink = Arc::new(InMemoryEventSink::new());
        let policy = FaultPolicy::latency(Probability::ALWAYS, Duration::from_secs(3));
        let (pipeline, _) =
            pipeline(policy, Arc::new(ScriptedRandomSource::constant(0.0)), &sink);
        let op = operation_fn(|_: OperationContext| async { Outcome::Success(3) });
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let outcome = pipeline.execute(&op, token).await;

        assert!(outcome.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn disabled_policy_is_transparent() {
        let sink = Arc::new(InMemoryEventSink::new());
        let random = Arc::new(ScriptedRandomSource::constant(0.0));
        let policy = FaultPolicy::status(Probability::ALWAYS, HttpStatus::INTERNAL_SERVER_ERROR)
            .with_enabled(false);
        let (pipeline, _) = pipeline(policy, random.clone(), &sink);
        let op = operation_fn(|_: OperationContext| async { Outcome::Success(1) });

        let outcome = pipeline.execute(&op, CancellationToken::new()).await;

        assert!(outcome.is_success());
        assert_eq!(random.draws(), 0);
    }

    #[tokio::test]
    async fn injection_rate_converges_over_many_calls() {
        let sink = Arc::new(InMemoryEventSink::new());
        let policy = FaultPolicy::status(
            Probability::new(0.8).unwrap(),
            HttpStatus::INTERNAL_SERVER_ERROR,
        );
        let (pipeline, injector) =
            pipeline(policy, Arc::new(SeededRandomSource::new(42)), &sink);
        let op = operation_fn(|_: OperationContext| async { Outcome::Success(0) });

        for _ in 0..10_000 {
            pipeline.execute(&op, CancellationToken::new()).await;
        }

        let rate = injector.stats().actual_fault_rate();
        assert!((rate - 0.8).abs() < 0.02, "observed rate {rate}");
    }

    #[test]
    fn strategy_name_follows_fault() {
        let sink: Arc<dyn EventSink> = Arc::new(InMemoryEventSink::new());
        let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandomSource::constant(0.0));
        let latency = FaultInjector::new(
            FaultPolicy::latency(Probability::ALWAYS, Duration::from_secs(1)),
            random.clone(),
            sink.clone(),
        );
        let outcome = FaultInjector::new(
            FaultPolicy::status(Probability::ALWAYS, HttpStatus::INTERNAL_SERVER_ERROR),
            random,
            sink,
        );
        assert_eq!(ResilienceStrategy::<u32>::name(&latency), "chaos_latency");
        assert_eq!(ResilienceStrategy::<u32>::name(&outcome), "chaos_outcome");
    }
}
