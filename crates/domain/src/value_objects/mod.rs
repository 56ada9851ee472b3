//! Value Objects - Immutable, identity-less domain primitives

mod error_kind;
mod http_status;
mod pipeline_kind;
mod probability;

pub use error_kind::ErrorKind;
pub use http_status::HttpStatus;
pub use pipeline_kind::PipelineKind;
pub use probability::Probability;
