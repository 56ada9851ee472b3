//! Timeout strategy
//!
//! Races the inner chain against a timer. The inner chain observes a child
//! cancellation token that fires when the timer wins, so a well-behaved
//! operation stops its work promptly.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use application::{EventSink, Next, ResilienceContext, ResilienceStrategy};
use async_trait::async_trait;
use domain::{DomainError, Failure, Outcome, ResilienceEvent};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for the timeout strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Budget for one attempt in milliseconds (default: 1000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    1_000
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl TimeoutConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfiguration`] for a zero timeout.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.timeout_ms == 0 {
            return Err(DomainError::invalid_configuration(
                "timeout.timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

enum Race<T> {
    Cancelled,
    Completed(Outcome<T>),
    Elapsed,
}

/// Bounds the duration of one pass through the inner chain
pub struct TimeoutStrategy {
    timeout: Duration,
    sink: Arc<dyn EventSink>,
}

impl TimeoutStrategy {
    pub fn new(timeout: Duration, sink: Arc<dyn EventSink>) -> Self {
        Self { timeout, sink }
    }

    pub fn from_config(config: &TimeoutConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::new(config.timeout(), sink)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for TimeoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeoutStrategy")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + 'static> ResilienceStrategy<T> for TimeoutStrategy {
    fn name(&self) -> &'static str {
        "timeout"
    }

    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T> {
        let caller = ctx.cancellation().clone();
        let attempt = caller.child_token();
        let previous = ctx.replace_cancellation(attempt.clone());

        let race = tokio::select! {
            biased;
            () = caller.cancelled() => Race::Cancelled,
            outcome = next.run(ctx) => Race::Completed(outcome),
            () = tokio::time::sleep(self.timeout) => Race::Elapsed,
        };
        ctx.replace_cancellation(previous);

        match race {
            Race::Cancelled => Outcome::Failure(Failure::cancelled()),
            Race::Completed(outcome) => outcome,
            Race::Elapsed => {
                attempt.cancel();
                warn!(
                    pipeline = %ctx.pipeline(),
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Attempt timed out"
                );
                self.sink.emit(
                    ctx.pipeline(),
                    &ResilienceEvent::TimeoutElapsed {
                        timeout: self.timeout,
                    },
                );
                Outcome::Failure(Failure::timeout(self.timeout))
            },
        }
    }
}
