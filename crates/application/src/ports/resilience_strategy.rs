//! Resilience strategy port
//!
//! Every strategy (retry, circuit breaker, timeout, fallback, chaos) is a
//! middleware with one capability: run the rest of the chain, possibly
//! several times, possibly not at all, and decide what outcome to return.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::Outcome;

use super::operation::Operation;
use crate::resilience_context::ResilienceContext;

/// One layer of a resilience pipeline
#[async_trait]
pub trait ResilienceStrategy<T: Send + 'static>: Send + Sync + fmt::Debug {
    /// Short identifier used in diagnostics
    fn name(&self) -> &'static str;

    /// Handle one call, delegating inward through `next`
    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T>;
}

/// The remainder of the chain below the current strategy
///
/// `Next` is `Copy`, so a strategy may run the inner chain repeatedly.
pub struct Next<'a, T: Send + 'static> {
    strategies: &'a [Arc<dyn ResilienceStrategy<T>>],
    operation: &'a dyn Operation<T>,
}

impl<'a, T: Send + 'static> Next<'a, T> {
    /// Chain that runs `strategies` outermost-first, then `operation`
    #[must_use]
    pub const fn new(
        strategies: &'a [Arc<dyn ResilienceStrategy<T>>],
        operation: &'a dyn Operation<T>,
    ) -> Self {
        Self {
            strategies,
            operation,
        }
    }

    /// Run the inner chain once
    pub async fn run(self, ctx: &mut ResilienceContext) -> Outcome<T> {
        match self.strategies.split_first() {
            Some((strategy, rest)) => {
                let next = Next::new(rest, self.operation);
                strategy.execute(ctx, next).await
            },
            None => self.operation.call(ctx).await,
        }
    }

    /// Number of strategies still ahead of the operation
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.strategies.len()
    }
}

impl<T: Send + 'static> Clone for Next<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + 'static> Copy for Next<'_, T> {}

impl<T: Send + 'static> fmt::Debug for Next<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("strategies", &self.strategies)
            .finish_non_exhaustive()
    }
}
