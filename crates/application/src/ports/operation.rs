//! The user-supplied call a pipeline protects

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use domain::Outcome;

use crate::resilience_context::{OperationContext, ResilienceContext};

/// Terminal operation at the centre of a pipeline
///
/// Implementations should observe `ctx.cancellation()` and return
/// [`domain::Failure::cancelled`] promptly when it fires.
#[async_trait]
pub trait Operation<T: Send + 'static>: Send + Sync {
    async fn call(&self, ctx: &ResilienceContext) -> Outcome<T>;
}

/// Adapter turning an async closure into an [`Operation`]
pub struct OperationFn<F> {
    f: F,
}

impl<F> fmt::Debug for OperationFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationFn").finish_non_exhaustive()
    }
}

/// Wrap `f` as an [`Operation`]
///
/// The closure receives an owned [`OperationContext`] snapshot for the
/// current attempt.
///
/// # Examples
///
/// ```
/// use application::{operation_fn, OperationContext};
/// use domain::Outcome;
///
/// let op = operation_fn(|ctx: OperationContext| async move {
///     Outcome::<u32>::Success(ctx.attempt)
/// });
/// # let _ = op;
/// ```
pub const fn operation_fn<F>(f: F) -> OperationFn<F> {
    OperationFn { f }
}

#[async_trait]
impl<T, F, Fut> Operation<T> for OperationFn<F>
where
    T: Send + 'static,
    F: Fn(OperationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Outcome<T>> + Send + 'static,
{
    async fn call(&self, ctx: &ResilienceContext) -> Outcome<T> {
        (self.f)(ctx.operation_context()).await
    }
}
