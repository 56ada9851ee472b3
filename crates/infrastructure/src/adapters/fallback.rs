//! Fallback strategy
//!
//! Last line of defence: when the final outcome of the inner chain is a
//! failure the predicate recognises, replace it with a synthetic success.
//! Caller cancellation is never replaced.

use std::fmt;
use std::sync::Arc;

use application::predicates::{self, OutcomePredicate};
use application::{EventSink, Next, ResilienceContext, ResilienceStrategy};
use async_trait::async_trait;
use chrono::Utc;
use domain::{FallbackPayload, HttpResponse, Outcome, ResilienceEvent};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Builds the substitute outcome from the failed one
pub type OutcomeGenerator<T> = Arc<dyn Fn(&Outcome<T>) -> Outcome<T> + Send + Sync>;

/// Configuration for the synthetic fallback payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Message carried in the payload (default: "Fallback response")
    #[serde(default = "default_message")]
    pub message: String,

    /// Source tag carried in the payload (default: "bulwark.fallback")
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_message() -> String {
    FallbackPayload::DEFAULT_MESSAGE.to_string()
}

fn default_source() -> String {
    FallbackPayload::DEFAULT_SOURCE.to_string()
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            message: default_message(),
            source: default_source(),
        }
    }
}

/// Substitutes a synthetic success for recognised failures
pub struct FallbackStrategy<T: Send + 'static> {
    should_handle: OutcomePredicate<T>,
    generator: OutcomeGenerator<T>,
    sink: Arc<dyn EventSink>,
}

impl<T: Send + 'static> FallbackStrategy<T> {
    pub fn new(
        should_handle: OutcomePredicate<T>,
        generator: OutcomeGenerator<T>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            should_handle,
            generator,
            sink,
        }
    }
}

impl FallbackStrategy<HttpResponse> {
    /// Answer 5xx and transport failures with a `200 OK` diagnostic payload
    pub fn http(config: &FallbackConfig, sink: Arc<dyn EventSink>) -> Self {
        let config = config.clone();
        let generator: OutcomeGenerator<HttpResponse> = Arc::new(move |_failed| {
            let payload = FallbackPayload {
                message: config.message.clone(),
                source: config.source.clone(),
                timestamp: Utc::now(),
            };
            Outcome::Success(payload.to_response())
        });
        Self::new(predicates::server_error_or_transport(), generator, sink)
    }
}

impl<T: Send + 'static> fmt::Debug for FallbackStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackStrategy").finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + 'static> ResilienceStrategy<T> for FallbackStrategy<T> {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn execute(&self, ctx: &mut ResilienceContext, next: Next<'_, T>) -> Outcome<T> {
        let outcome = next.run(ctx).await;

        let Some(failure) = outcome.failure() else {
            return outcome;
        };
        if failure.kind().is_cancellation() || !(self.should_handle)(&outcome) {
            return outcome;
        }

        info!(
            pipeline = %ctx.pipeline(),
            error_kind = %failure.kind(),
            status = ?failure.status().map(|s| s.as_u16()),
            "Substituting fallback response"
        );
        self.sink.emit(
            ctx.pipeline(),
            &ResilienceEvent::FallbackTriggered {
                error_kind: failure.kind(),
                status: failure.status(),
            },
        );
        (self.generator)(&outcome)
    }
}
