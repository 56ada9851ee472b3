//! Standard pipeline wiring
//!
//! Assembles the named pipelines from configuration. Strategy order is fixed
//! per [`PipelineKind`]; only the parameters come from [`AppConfig`].

use std::sync::Arc;

use application::{
    ApplicationError, EventSink, PipelineRegistry, RandomSource, ResiliencePipeline,
    ResiliencePipelineBuilder,
};
use domain::{DomainError, HttpResponse, PipelineKind};
use tracing::info;

use crate::adapters::{CircuitBreaker, FallbackStrategy, TimeoutStrategy};
use crate::chaos::{FaultInjector, FaultPolicy};
use crate::config::AppConfig;
use crate::retry::RetryStrategy;

/// Append a fault injector unless chaos is switched off
fn with_chaos(
    builder: ResiliencePipelineBuilder<HttpResponse>,
    policy: FaultPolicy,
    random: &Arc<dyn RandomSource>,
    sink: &Arc<dyn EventSink>,
) -> ResiliencePipelineBuilder<HttpResponse> {
    if !policy.enabled {
        return builder;
    }
    builder.with_strategy(FaultInjector::new(policy, random.clone(), sink.clone()))
}

/// Build one standard pipeline
///
/// # Errors
///
/// Returns an error when a configured rate or status is out of range.
pub fn build_pipeline(
    kind: PipelineKind,
    config: &AppConfig,
    sink: &Arc<dyn EventSink>,
    random: &Arc<dyn RandomSource>,
) -> Result<ResiliencePipeline<HttpResponse>, DomainError> {
    let chaos = &config.chaos;
    let builder = ResiliencePipeline::builder(kind.as_str());

    let builder = match kind {
        PipelineKind::Retry => builder.with_retry(|attempts| {
            RetryStrategy::new(&config.retry, sink.clone(), attempts)
        }),
        PipelineKind::RetryChaos => with_chaos(
            builder.with_retry(|attempts| {
                RetryStrategy::new(&config.retry, sink.clone(), attempts)
            }),
            chaos.outcome_policy(chaos.retry_outcome_rate)?,
            random,
            sink,
        ),
        PipelineKind::TimeoutLatencyChaos => {
            let builder = with_chaos(
                builder.with_strategy(TimeoutStrategy::from_config(&config.timeout, sink.clone())),
                chaos.latency_policy()?,
                random,
                sink,
            );
            with_chaos(
                builder,
                chaos.outcome_policy(chaos.timeout_outcome_rate)?,
                random,
                sink,
            )
        },
        PipelineKind::CircuitBreakerChaos => with_chaos(
            builder.with_strategy(CircuitBreaker::new(
                kind.as_str(),
                config.circuit_breaker.clone(),
                sink.clone(),
            )),
            chaos.outcome_policy(chaos.circuit_breaker_outcome_rate)?,
            random,
            sink,
        ),
        PipelineKind::FallbackChaos => with_chaos(
            builder.with_strategy(FallbackStrategy::http(&config.fallback, sink.clone())),
            chaos.outcome_policy(chaos.fallback_outcome_rate)?,
            random,
            sink,
        ),
    };

    Ok(builder.build())
}

/// Build a registry holding every [`PipelineKind`]
///
/// # Errors
///
/// Fails on invalid configuration.
pub fn build_standard_registry(
    config: &AppConfig,
    sink: Arc<dyn EventSink>,
    random: Arc<dyn RandomSource>,
) -> Result<PipelineRegistry<HttpResponse>, ApplicationError> {
    config.validate()?;

    let mut registry = PipelineRegistry::new();
    for kind in PipelineKind::ALL {
        registry.register(build_pipeline(kind, config, &sink, &random)?)?;
    }

    info!(
        pipelines = registry.len(),
        chaos_enabled = config.chaos.enabled,
        "Standard pipelines ready"
    );
    Ok(registry)
}
