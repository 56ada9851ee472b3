//! Registry of named pipelines
//!
//! Callers address pipelines by name, the way an HTTP client factory hands
//! out named clients.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use domain::Outcome;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::error::ApplicationError;
use crate::pipeline::ResiliencePipeline;
use crate::ports::Operation;

/// Pipelines keyed by name
pub struct PipelineRegistry<T: Send + 'static> {
    pipelines: BTreeMap<String, Arc<ResiliencePipeline<T>>>,
}

impl<T: Send + 'static> PipelineRegistry<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pipelines: BTreeMap::new(),
        }
    }

    /// Register `pipeline` under its own name
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::DuplicatePipeline`] if the name is taken.
    pub fn register(&mut self, pipeline: ResiliencePipeline<T>) -> Result<(), ApplicationError> {
        let name = pipeline.name().to_string();
        if self.pipelines.contains_key(&name) {
            return Err(ApplicationError::DuplicatePipeline(name));
        }

        info!(
            pipeline = %name,
            strategies = ?pipeline.strategy_names(),
            "Registered resilience pipeline"
        );
        self.pipelines.insert(name, Arc::new(pipeline));
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ResiliencePipeline<T>>> {
        self.pipelines.get(name).cloned()
    }

    /// Registered names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.pipelines.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Execute `operation` through the pipeline called `name`
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::UnknownPipeline`] if no such pipeline is
    /// registered. Call failures are reported in the returned [`Outcome`].
    #[instrument(skip(self, operation, cancellation))]
    pub async fn execute(
        &self,
        name: &str,
        operation: &dyn Operation<T>,
        cancellation: CancellationToken,
    ) -> Result<Outcome<T>, ApplicationError> {
        let Some(pipeline) = self.pipelines.get(name) else {
            warn!(pipeline = %name, "Unknown resilience pipeline requested");
            return Err(ApplicationError::UnknownPipeline(name.to_string()));
        };

        Ok(pipeline.execute(operation, cancellation).await)
    }
}

impl<T: Send + 'static> Default for PipelineRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> fmt::Debug for PipelineRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("pipelines", &self.names())
            .finish()
    }
}
