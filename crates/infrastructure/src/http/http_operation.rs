//! Downstream HTTP call as a pipeline operation
//!
//! Each call issues one GET. The response is classified here so that
//! strategies only ever see an [`Outcome`].

use std::time::Duration;

use application::{Operation, ResilienceContext};
use async_trait::async_trait;
use domain::{Failure, HttpResponse, HttpStatus, Outcome};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// User agent string sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Connection timeout in milliseconds (default: 5s)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_user_agent() -> String {
    format!("bulwark/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_request_timeout_ms() -> u64 {
    30_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl HttpClientConfig {
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

enum Response {
    Cancelled,
    Received(Result<(u16, String), reqwest::Error>),
}

/// GETs a fixed URL
#[derive(Debug, Clone)]
pub struct HttpOperation {
    client: Client,
    url: String,
}

impl HttpOperation {
    /// Build an operation with its own client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client cannot be built.
    pub fn new(url: impl Into<String>, config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self::with_client(client, url))
    }

    /// Share an existing client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<(u16, String), reqwest::Error> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

fn classify(status: u16, body: String) -> Outcome<HttpResponse> {
    match HttpStatus::new(status) {
        Ok(status) => HttpResponse::new(status, body).into_outcome(),
        Err(e) => Outcome::Failure(Failure::transport(e.to_string())),
    }
}

#[async_trait]
impl Operation<HttpResponse> for HttpOperation {
    #[instrument(skip(self, ctx), fields(url = %self.url, attempt = ctx.attempt()))]
    async fn call(&self, ctx: &ResilienceContext) -> Outcome<HttpResponse> {
        let cancellation = ctx.cancellation().clone();
        let response = tokio::select! {
            biased;
            () = cancellation.cancelled() => Response::Cancelled,
            result = self.fetch() => Response::Received(result),
        };

        match response {
            Response::Cancelled => Outcome::Failure(Failure::cancelled()),
            Response::Received(Ok((status, body))) => {
                debug!(status, "Received response");
                classify(status, body)
            },
            Response::Received(Err(e)) => {
                debug!(error = %e, "Request failed");
                Outcome::Failure(Failure::transport(e.to_string()))
            },
        }
    }
}
