//! Retry strategy with a fixed backoff schedule
//!
//! Re-runs the inner chain while the outcome is classified retryable and the
//! retry budget lasts. The delay before retry *k* comes from a delay
//! generator; the standard generator reads a table (1s, 2s, 4s) and yields
//! zero for retries beyond it.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, RetryStrategy};
//!
//! let pipeline = ResiliencePipeline::builder("retry")
//!     .with_retry(|attempts| RetryStrategy::new(&RetryConfig::default(), sink, attempts))
//!     .build();
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use application::predicates::{self, OutcomePredicate};
use application::{AttemptCounter, EventSink, Next, ResilienceContext, ResilienceStrategy};
use async_trait::async_trait;
use domain::{Failure, Outcome, ResilienceEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Maps a retry number (1 for the first retry) to the wait before it
pub type DelayGenerator = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries allowed after the first try (default: 3)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before each retry in milliseconds (default: 1000, 2000, 4000)
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: Vec<u64>,
}

const fn default_max_retries() -> u32 {
    3
}

fn default_backoff_ms() -> Vec<u64> {
    vec![1_000, 2_000, 4_000]
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryConfig {
    /// Set the retry budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff table
    #[must_use]
    pub fn with_backoff(mut self, backoff: &[Duration]) -> Self {
        self.backoff_ms = backoff
            .iter()
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .collect();
        self
    }

    /// Delay before retry number `retry` (1-based)
    ///
    /// Retries past the end of the table wait zero.
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        retry
            .checked_sub(1)
            .and_then(|index| self.backoff_ms.get(index as usize))
            .map_or(Duration::ZERO, |ms| Duration::from_millis(*ms))
    }

    /// Delay generator backed by this configuration's table
    #[must_use]
    pub fn delay_generator(&self) -> DelayGenerator {
        let table = self.clone();
        Arc::new(move |retry| table.delay_for_retry(retry))
    }
}

/// Retries the inner chain on retryable outcomes
pub struct RetryStrategy<T: Send + 'static> {
    max_retries: u32,
    delay: DelayGenerator,
    should_retry: OutcomePredicate<T>,
    sink: Arc<dyn EventSink>,
    attempts: AttemptCounter,
}

impl<T: Send + 'static> RetryStrategy<T> {
    /// Retry transient failures according to `config`
    ///
    /// `attempts` comes from [`application::ResiliencePipelineBuilder::with_retry`].
    pub fn new(config: &RetryConfig, sink: Arc<dyn EventSink>, attempts: AttemptCounter) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.delay_generator(),
            should_retry: predicates::transient(),
            sink,
            attempts,
        }
    }

    /// Replace the retryable-outcome predicate
    ///
    /// Caller cancellation is never retried, whatever the predicate says.
    #[must_use]
    pub fn with_predicate(mut self, should_retry: OutcomePredicate<T>) -> Self {
        self.should_retry = should_retry;
        self
    }

    /// Replace the delay generator
    #[must_use]
    pub fn with_delay_generator(mut self, delay: DelayGenerator) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

impl<T: Send + 'static> fmt::Debug for RetryStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryStrategy")
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + 'static> ResilienceStrategy<T> for RetryStrategy<T> {
    fn name(&self) -> &'static str {
        "retry"
    }

    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T> {
        let mut retries = 0u32;

        loop {
            let outcome = next.run(ctx).await;
            let Some(failure) = outcome.failure() else {
                if retries > 0 {
                    debug!(
                        pipeline = %ctx.pipeline(),
                        retries,
                        "Operation succeeded after retries"
                    );
                }
                return outcome;
            };

            if failure.kind().is_cancellation() {
                return outcome;
            }
            ctx.record_error(failure);

            if !(self.should_retry)(&outcome) {
                debug!(
                    pipeline = %ctx.pipeline(),
                    error_kind = %failure.kind(),
                    "Operation failed with non-retryable outcome"
                );
                return outcome;
            }

            if retries >= self.max_retries {
                warn!(
                    pipeline = %ctx.pipeline(),
                    attempts = retries + 1,
                    max_retries = self.max_retries,
                    error = %failure,
                    "Operation failed after max retries"
                );
                return outcome;
            }

            retries += 1;
            let delay = (self.delay)(retries);
            warn!(
                pipeline = %ctx.pipeline(),
                retry = retries,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %failure,
                "Operation failed, retrying"
            );
            self.sink.emit(
                ctx.pipeline(),
                &ResilienceEvent::RetryScheduled {
                    attempt: retries,
                    error_kind: failure.kind(),
                    delay,
                },
            );

            let cancellation = ctx.cancellation().clone();
            tokio::select! {
                biased;
                () = cancellation.cancelled() => return Outcome::Failure(Failure::cancelled()),
                () = tokio::time::sleep(delay) => {},
            }
            ctx.advance_attempt(&self.attempts);
        }
    }
}
