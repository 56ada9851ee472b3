//! Per-invocation state threaded through a resilience pipeline
//!
//! A [`ResilienceContext`] is created fresh by the pipeline for every call and
//! dropped when the call returns. It is owned exclusively by that call, so it
//! needs no locking.
//!
//! # Examples
//!
//! ```
//! use application::ResilienceContext;
//! use tokio_util::sync::CancellationToken;
//!
//! let mut ctx = ResilienceContext::new("retry", CancellationToken::new());
//! assert_eq!(ctx.attempt(), 0);
//!
//! ctx.set_property("region", "eu-west");
//! assert_eq!(ctx.property("region").and_then(|v| v.as_str()), Some("eu-west"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domain::Failure;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Property key under which the current attempt number is published
pub const ATTEMPT_PROPERTY: &str = "attempt";
/// Property key holding the kind of the most recently recorded failure
pub const LAST_ERROR_KIND_PROPERTY: &str = "last_error_kind";
/// Property key holding the detail of the most recently recorded failure
pub const LAST_ERROR_DETAIL_PROPERTY: &str = "last_error_detail";

/// Mutable record for one pipeline execution
#[derive(Debug)]
pub struct ResilienceContext {
    pipeline: String,
    cancellation: CancellationToken,
    attempt: u32,
    properties: HashMap<String, Value>,
    started_at: DateTime<Utc>,
}

impl ResilienceContext {
    /// Create a context for one execution of `pipeline`
    pub fn new(pipeline: impl Into<String>, cancellation: CancellationToken) -> Self {
        Self {
            pipeline: pipeline.into(),
            cancellation,
            attempt: 0,
            properties: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Name of the executing pipeline
    #[must_use]
    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    /// Cancellation signal observed by the current attempt
    ///
    /// Inside a timeout this is a child of the caller's token, so it also
    /// fires when the attempt runs out of time.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Swap the cancellation signal, returning the previous one
    ///
    /// Strategies that narrow cancellation (timeout) install a child token for
    /// the inner chain and must restore the returned token afterwards.
    pub fn replace_cancellation(&mut self, token: CancellationToken) -> CancellationToken {
        std::mem::replace(&mut self.cancellation, token)
    }

    /// Zero-based number of the current attempt
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Move to the next attempt and return its number
    ///
    /// Requires the pipeline's [`AttemptCounter`], which only the strategy
    /// added through [`ResiliencePipelineBuilder::with_retry`] holds.
    ///
    /// [`ResiliencePipelineBuilder::with_retry`]: crate::ResiliencePipelineBuilder::with_retry
    pub fn advance_attempt(&mut self, _counter: &AttemptCounter) -> u32 {
        self.attempt = self.attempt.saturating_add(1);
        self.properties
            .insert(ATTEMPT_PROPERTY.to_string(), Value::from(self.attempt));
        self.attempt
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    /// Publish the latest classified failure for diagnostics
    pub fn record_error(&mut self, failure: &Failure) {
        self.set_property(LAST_ERROR_KIND_PROPERTY, failure.kind().as_str());
        self.set_property(LAST_ERROR_DETAIL_PROPERTY, failure.detail());
    }

    /// When the execution started
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Snapshot handed to the user operation
    #[must_use]
    pub fn operation_context(&self) -> OperationContext {
        OperationContext {
            pipeline: self.pipeline.clone(),
            cancellation: self.cancellation.clone(),
            attempt: self.attempt,
        }
    }
}

/// Permission to advance [`ResilienceContext::attempt`]
///
/// Cannot be constructed outside this crate; the pipeline builder hands one
/// to the retry strategy.
///
/// ```compile_fail
/// let counter = application::AttemptCounter::new();
/// ```
#[derive(Debug)]
pub struct AttemptCounter {
    _sealed: (),
}

impl AttemptCounter {
    pub(crate) const fn new() -> Self {
        Self { _sealed: () }
    }
}

/// What the user operation sees of the execution
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub pipeline: String,
    /// Fires on caller cancellation or when the attempt times out
    pub cancellation: CancellationToken,
    pub attempt: u32,
}

#[cfg(test)]
mod tests {
    use domain::{ErrorKind, HttpStatus};

    use super::*;

    #[test]
    fn starts_at_attempt_zero() {
        let ctx = ResilienceContext::new("retry", CancellationToken::new());
        assert_eq!(ctx.attempt(), 0);
        assert_eq!(ctx.pipeline(), "retry");
        assert!(ctx.property(ATTEMPT_PROPERTY).is_none());
    }

    #[test]
    fn advance_attempt_publishes_property() {
        let counter = AttemptCounter::new();
        let mut ctx = ResilienceContext::new("retry", CancellationToken::new());
        assert_eq!(ctx.advance_attempt(&counter), 1);
        assert_eq!(ctx.advance_attempt(&counter), 2);
        assert_eq!(ctx.property(ATTEMPT_PROPERTY), Some(&Value::from(2)));
    }

    #[test]
    fn record_error_overwrites_previous() {
        let mut ctx = ResilienceContext::new("retry", CancellationToken::new());
        ctx.record_error(&Failure::transport("reset"));
        ctx.record_error(&Failure::unsuccessful(HttpStatus::BAD_GATEWAY));

        assert_eq!(
            ctx.property(LAST_ERROR_KIND_PROPERTY).and_then(Value::as_str),
            Some(ErrorKind::UnsuccessfulResult.as_str())
        );
        assert_eq!(
            ctx.property(LAST_ERROR_DETAIL_PROPERTY).and_then(Value::as_str),
            Some("HTTP 502")
        );
    }

    #[test]
    fn replace_cancellation_returns_previous_token() {
        let parent = CancellationToken::new();
        let mut ctx = ResilienceContext::new("timeout", parent.clone());

        let child = parent.child_token();
        let previous = ctx.replace_cancellation(child.clone());
        child.cancel();

        assert!(ctx.is_cancelled());
        assert!(!previous.is_cancelled());

        ctx.replace_cancellation(previous);
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn operation_context_snapshots_state() {
        let mut ctx = ResilienceContext::new("retry", CancellationToken::new());
        ctx.advance_attempt(&AttemptCounter::new());
        let op_ctx = ctx.operation_context();
        ctx.cancellation().cancel();

        assert_eq!(op_ctx.attempt, 1);
        assert_eq!(op_ctx.pipeline, "retry");
        assert!(op_ctx.cancellation.is_cancelled());
    }

    #[test]
    fn properties_round_trip() {
        let mut ctx = ResilienceContext::new("p", CancellationToken::new());
        ctx.set_property("k", 3);
        assert_eq!(ctx.remove_property("k"), Some(Value::from(3)));
        assert!(ctx.property("k").is_none());
    }
}
