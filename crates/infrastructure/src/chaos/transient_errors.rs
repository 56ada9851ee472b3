//! Simulated transient downstream errors.
//!
//! Wraps an operation so that a share of calls fail the way a flaky network
//! or overloaded upstream would, without touching the wrapped operation.

use std::fmt;
use std::sync::Arc;

use application::{Operation, RandomSource, ResilienceContext};
use async_trait::async_trait;
use domain::{Failure, HttpStatus, Outcome, Probability};
use tracing::debug;

/// Decorator that fails a share of calls with a transient status
pub struct TransientErrorOperation<O> {
    inner: O,
    error_chance: Probability,
    random: Arc<dyn RandomSource>,
}

impl<O> TransientErrorOperation<O> {
    pub fn new(inner: O, error_chance: Probability, random: Arc<dyn RandomSource>) -> Self {
        Self {
            inner,
            error_chance,
            random,
        }
    }

    #[must_use]
    pub const fn error_chance(&self) -> Probability {
        self.error_chance
    }

    #[must_use]
    pub const fn inner(&self) -> &O {
        &self.inner
    }

    fn pick_status(&self) -> HttpStatus {
        let statuses = HttpStatus::TRANSIENT;
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = (self.random.next_f64() * statuses.len() as f64) as usize;
        statuses[index.min(statuses.len() - 1)]
    }
}

impl<O: fmt::Debug> fmt::Debug for TransientErrorOperation<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransientErrorOperation")
            .field("inner", &self.inner)
            .field("error_chance", &self.error_chance)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T, O> Operation<T> for TransientErrorOperation<O>
where
    T: Send + 'static,
    O: Operation<T>,
{
    async fn call(&self, ctx: &ResilienceContext) -> Outcome<T> {
        if !self.error_chance.admits(self.random.next_f64()) {
            return self.inner.call(ctx).await;
        }

        let status = self.pick_status();
        debug!(
            pipeline = %ctx.pipeline(),
            attempt = ctx.attempt(),
            status = status.as_u16(),
            "Simulating transient error"
        );
        Outcome::Failure(
            Failure::transport(format!("simulated transient error (HTTP {status})"))
                .with_status(status),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use application::{OperationContext, operation_fn};
    use domain::ErrorKind;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::adapters::ScriptedRandomSource;

    fn ctx() -> ResilienceContext {
        ResilienceContext::new("test", CancellationToken::new())
    }

    #[tokio::test]
    async fn delegates_when_draw_misses() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let inner = operation_fn(move |_: OperationContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Outcome::Success("ok") }
        });
        let op = TransientErrorOperation::new(
            inner,
            Probability::new(0.3).unwrap(),
            Arc::new(ScriptedRandomSource::constant(0.5)),
        );

        let outcome = op.call(&ctx()).await;

        assert_eq!(outcome.value(), Some(&"ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fails_with_transient_status_when_draw_hits() {
        let inner = operation_fn(|_: OperationContext| async { Outcome::Success(()) });
        // first draw decides, second picks the status (0.5 * 5 -> index 2)
        let op = TransientErrorOperation::new(
            inner,
            Probability::new(0.3).unwrap(),
            Arc::new(ScriptedRandomSource::new(vec![0.1, 0.5])),
        );

        let outcome = op.call(&ctx()).await;
        let failure = outcome.failure().unwrap();

        assert_eq!(failure.kind(), ErrorKind::TransportFailure);
        assert_eq!(failure.status(), Some(HttpStatus::BAD_GATEWAY));
        assert!(failure.is_transient());
    }

    #[tokio::test]
    async fn status_pick_covers_table_edges() {
        let inner = operation_fn(|_: OperationContext| async { Outcome::Success(()) });
        let op = TransientErrorOperation::new(
            inner,
            Probability::ALWAYS,
            Arc::new(ScriptedRandomSource::new(vec![0.0, 0.0, 0.0, 0.999_999])),
        );

        let first = op.call(&ctx()).await;
        let second = op.call(&ctx()).await;

        assert_eq!(
            first.failure().and_then(Failure::status),
            Some(HttpStatus::REQUEST_TIMEOUT)
        );
        assert_eq!(
            second.failure().and_then(Failure::status),
            Some(HttpStatus::GATEWAY_TIMEOUT)
        );
    }

    #[tokio::test]
    async fn zero_chance_never_fails() {
        let inner = operation_fn(|_: OperationContext| async { Outcome::Success(1) });
        let op = TransientErrorOperation::new(
            inner,
            Probability::NEVER,
            Arc::new(ScriptedRandomSource::constant(0.0)),
        );

        for _ in 0..20 {
            assert!(op.call(&ctx()).await.is_success());
        }
    }
}
