//! Entities of the resilience domain

mod http_response;
mod outcome;
mod resilience_event;

pub use http_response::{FallbackPayload, HttpResponse};
pub use outcome::{Failure, Outcome};
pub use resilience_event::ResilienceEvent;
