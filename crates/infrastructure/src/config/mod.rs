//! Application configuration
//!
//! Every section has serde defaults equal to the standing values, so an
//! empty file (or none at all) yields a working configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `bulwark.toml` in the working directory, or an explicit path
//! 3. environment variables such as `BULWARK_RETRY__MAX_RETRIES=5`

mod resilience;

use std::path::Path;

use domain::DomainError;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use resilience::ChaosAppConfig;

use crate::adapters::{CircuitBreakerConfig, FallbackConfig, TimeoutConfig};
use crate::http::HttpClientConfig;
use crate::retry::RetryConfig;
use crate::telemetry::TelemetryConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BULWARK";

/// Configuration file looked up when no path is given (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "bulwark";

pub(crate) const fn default_true() -> bool {
    true
}

/// Environment overrides (e.g., BULWARK_CHAOS__ENABLED=false)
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("retry.backoff_ms")
        .try_parsing(true)
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,

    #[serde(default)]
    pub timeout: TimeoutConfig,

    #[serde(default)]
    pub chaos: ChaosAppConfig,

    #[serde(default)]
    pub fallback: FallbackConfig,

    #[serde(default)]
    pub http: HttpClientConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the process environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(path, environment())
    }

    /// Like [`Self::load`], reading variables from `vars` instead of the process
    pub fn load_with_env(
        path: Option<&Path>,
        vars: config::Map<String, String>,
    ) -> Result<Self, config::ConfigError> {
        Self::load_from(path, environment().source(Some(vars)))
    }

    fn load_from(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        debug!(?path, chaos_enabled = config.chaos.enabled, "Configuration loaded");
        Ok(config)
    }

    /// Check every section for out-of-range values
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.circuit_breaker.validate()?;
        self.timeout.validate()?;
        self.chaos.validate()?;
        Ok(())
    }

    /// Render as TOML, suitable for a starter `bulwark.toml`
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
