//! Infrastructure layer - Strategy implementations and adapters
//!
//! Implements the ports defined in the application layer: the resilience
//! strategies themselves, event sinks, random sources, the HTTP operation,
//! configuration loading and telemetry bootstrap.

pub mod adapters;
pub mod chaos;
pub mod config;
pub mod http;
pub mod pipelines;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use chaos::{ChaosStats, FaultInjector, FaultPolicy, FaultType, TransientErrorOperation};
pub use config::{AppConfig, ChaosAppConfig};
pub use http::{HttpClientConfig, HttpOperation};
pub use pipelines::{build_pipeline, build_standard_registry};
pub use retry::{DelayGenerator, RetryConfig, RetryStrategy};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
