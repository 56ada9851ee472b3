//! Pipeline executor
//!
//! A [`ResiliencePipeline`] is an ordered list of strategies around a
//! caller-supplied [`Operation`]. It only wires the layers together; all
//! failure handling lives in the strategies.

use std::fmt;
use std::sync::Arc;

use domain::{Failure, Outcome};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::ports::{Next, Operation, ResilienceStrategy};
use crate::resilience_context::{AttemptCounter, ResilienceContext};

/// Named, immutable composition of strategies
///
/// Safe for unlimited concurrent executions. Only strategies that keep their
/// own shared state (the circuit breaker) are affected by other executions.
pub struct ResiliencePipeline<T: Send + 'static> {
    name: String,
    strategies: Vec<Arc<dyn ResilienceStrategy<T>>>,
}

impl<T: Send + 'static> ResiliencePipeline<T> {
    /// Start building a pipeline called `name`
    pub fn builder(name: impl Into<String>) -> ResiliencePipelineBuilder<T> {
        ResiliencePipelineBuilder {
            name: name.into(),
            strategies: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strategy names, outermost first
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run `operation` through every strategy with a fresh context
    pub async fn execute(
        &self,
        operation: &dyn Operation<T>,
        cancellation: CancellationToken,
    ) -> Outcome<T> {
        let mut ctx = ResilienceContext::new(self.name.clone(), cancellation);
        self.execute_with_context(&mut ctx, operation).await
    }

    /// Run `operation` with a caller-prepared context
    ///
    /// Caller cancellation aborts the chain immediately, dropping any pending
    /// waits, and resolves to [`domain::ErrorKind::Cancelled`].
    pub async fn execute_with_context(
        &self,
        ctx: &mut ResilienceContext,
        operation: &dyn Operation<T>,
    ) -> Outcome<T> {
        let cancellation = ctx.cancellation().clone();
        if cancellation.is_cancelled() {
            return Outcome::Failure(Failure::cancelled());
        }

        let next = Next::new(&self.strategies, operation);
        let outcome = tokio::select! {
            biased;
            () = cancellation.cancelled() => Outcome::Failure(Failure::cancelled()),
            outcome = next.run(ctx) => outcome,
        };

        debug!(
            pipeline = %self.name,
            success = outcome.is_success(),
            error_kind = ?outcome.error_kind(),
            attempts = ctx.attempt().saturating_add(1),
            "Pipeline execution finished"
        );
        outcome
    }
}

impl<T: Send + 'static> fmt::Debug for ResiliencePipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResiliencePipeline")
            .field("name", &self.name)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// Builder for [`ResiliencePipeline`]
///
/// Strategies are added outermost first.
pub struct ResiliencePipelineBuilder<T: Send + 'static> {
    name: String,
    strategies: Vec<Arc<dyn ResilienceStrategy<T>>>,
}

impl<T: Send + 'static> ResiliencePipelineBuilder<T> {
    /// Append a strategy inside the ones already added
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl ResilienceStrategy<T> + 'static) -> Self {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Append the strategy that owns the attempt counter
    ///
    /// `make` receives the only [`AttemptCounter`] a strategy can get. Every
    /// other strategy sees the attempt number read-only.
    #[must_use]
    pub fn with_retry<S, F>(self, make: F) -> Self
    where
        S: ResilienceStrategy<T> + 'static,
        F: FnOnce(AttemptCounter) -> S,
    {
        self.with_strategy(make(AttemptCounter::new()))
    }

    /// Append a strategy that is also held elsewhere (e.g. for inspection)
    #[must_use]
    pub fn with_shared_strategy(mut self, strategy: Arc<dyn ResilienceStrategy<T>>) -> Self {
        self.strategies.push(strategy);
        self
    }

    #[must_use]
    pub fn build(self) -> ResiliencePipeline<T> {
        ResiliencePipeline {
            name: self.name,
            strategies: self.strategies,
        }
    }
}

impl<T: Send + 'static> fmt::Debug for ResiliencePipelineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResiliencePipelineBuilder")
            .field("name", &self.name)
            .field("depth", &self.strategies.len())
            .finish()
    }
}
