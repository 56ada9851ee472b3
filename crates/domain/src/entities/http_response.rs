//! HTTP response as seen by the pipeline

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::{Failure, Outcome};
use crate::value_objects::HttpStatus;

/// Status and body of a received (or synthesized) response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    status: HttpStatus,
    body: String,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: HttpStatus, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a `200 OK` response
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(HttpStatus::OK, body)
    }

    #[must_use]
    pub const fn status(&self) -> HttpStatus {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Classify the response: 2xx is a success, anything else an unsuccessful result
    pub fn into_outcome(self) -> Outcome<Self> {
        if self.status.is_success() {
            Outcome::Success(self)
        } else {
            Outcome::Failure(Failure::unsuccessful(self.status))
        }
    }
}

/// Body of the response synthesized when the fallback strategy takes over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackPayload {
    pub message: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl FallbackPayload {
    pub const DEFAULT_MESSAGE: &'static str = "Fallback response";
    pub const DEFAULT_SOURCE: &'static str = "bulwark.fallback";

    /// Payload with the default message and source, stamped `timestamp`
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            message: Self::DEFAULT_MESSAGE.to_string(),
            source: Self::DEFAULT_SOURCE.to_string(),
            timestamp,
        }
    }

    /// Render as a `200 OK` JSON response
    #[must_use]
    pub fn to_response(&self) -> HttpResponse {
        let body = serde_json::json!({
            "message": self.message,
            "source": self.source,
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        HttpResponse::ok(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::value_objects::ErrorKind;

    #[test]
    fn success_status_becomes_success() {
        let outcome = HttpResponse::ok("hello").into_outcome();
        assert_eq!(outcome.value().map(HttpResponse::body), Some("hello"));
    }

    #[test]
    fn error_status_becomes_unsuccessful_result() {
        let outcome = HttpResponse::new(HttpStatus::BAD_GATEWAY, "").into_outcome();
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind(), ErrorKind::UnsuccessfulResult);
        assert_eq!(failure.status(), Some(HttpStatus::BAD_GATEWAY));
    }

    #[test]
    fn redirect_is_not_a_success() {
        let status = HttpStatus::new(302).unwrap();
        assert!(HttpResponse::new(status, "").into_outcome().is_failure());
    }

    #[test]
    fn fallback_payload_renders_ok_json() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let response = FallbackPayload::new(at).to_response();

        assert_eq!(response.status(), HttpStatus::OK);
        let payload: FallbackPayload = response.json().unwrap();
        assert_eq!(payload.message, "Fallback response");
        assert_eq!(payload.source, "bulwark.fallback");
        assert_eq!(payload.timestamp, at);
    }
}
