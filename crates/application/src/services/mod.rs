//! Application services

mod pipeline_registry;

pub use pipeline_registry::PipelineRegistry;
