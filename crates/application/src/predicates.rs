//! Outcome predicates shared by retry, circuit breaker and fallback
//!
//! A predicate decides whether an outcome counts as "handled" by a strategy.
//! None of the standard predicates ever match a caller cancellation.

use std::sync::Arc;

use domain::{Failure, Outcome};

/// Classifies outcomes for a strategy
pub type OutcomePredicate<T> = Arc<dyn Fn(&Outcome<T>) -> bool + Send + Sync>;

/// Transport failures, timeouts and transient statuses (408, 500, 502, 503, 504)
#[must_use]
pub fn transient<T: 'static>() -> OutcomePredicate<T> {
    Arc::new(|outcome: &Outcome<T>| outcome.failure().is_some_and(Failure::is_transient))
}

/// Any 5xx status or a transport failure
#[must_use]
pub fn server_error_or_transport<T: 'static>() -> OutcomePredicate<T> {
    Arc::new(|outcome: &Outcome<T>| {
        outcome
            .failure()
            .is_some_and(Failure::is_server_error_or_transport)
    })
}

/// Every failure except caller cancellation
#[must_use]
pub fn any_failure<T: 'static>() -> OutcomePredicate<T> {
    Arc::new(|outcome: &Outcome<T>| outcome.is_failure() && !outcome.is_cancelled())
}
