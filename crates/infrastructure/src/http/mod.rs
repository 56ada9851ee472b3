//! HTTP operation backed by `reqwest`

mod http_operation;

pub use http_operation::{HttpClientConfig, HttpOperation};
