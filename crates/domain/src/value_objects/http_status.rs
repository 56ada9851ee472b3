//! HTTP status value object
//!
//! Carries the status classification the resilience strategies reason about.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::HttpStatus;
//!
//! let status = HttpStatus::new(503).expect("valid status");
//! assert!(status.is_server_error());
//! assert!(status.is_transient());
//! assert!(!status.is_success());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// A validated HTTP status code (100-599)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct HttpStatus(u16);

impl HttpStatus {
    /// 200 OK
    pub const OK: Self = Self(200);
    /// 408 Request Timeout
    pub const REQUEST_TIMEOUT: Self = Self(408);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);
    /// 502 Bad Gateway
    pub const BAD_GATEWAY: Self = Self(502);
    /// 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: Self = Self(503);
    /// 504 Gateway Timeout
    pub const GATEWAY_TIMEOUT: Self = Self(504);

    /// Statuses considered likely to succeed on a later attempt
    pub const TRANSIENT: [Self; 5] = [
        Self::REQUEST_TIMEOUT,
        Self::INTERNAL_SERVER_ERROR,
        Self::BAD_GATEWAY,
        Self::SERVICE_UNAVAILABLE,
        Self::GATEWAY_TIMEOUT,
    ];

    /// Create a validated status code
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusCode` outside 100-599.
    pub fn new(code: u16) -> Result<Self, DomainError> {
        if (100..=599).contains(&code) {
            Ok(Self(code))
        } else {
            Err(DomainError::InvalidStatusCode(code))
        }
    }

    /// Numeric status code
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 <= 299
    }

    /// 5xx
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500
    }

    /// One of the designated transient categories: 408, 500, 502, 503, 504
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.0, 408 | 500 | 502 | 503 | 504)
    }
}

impl TryFrom<u16> for HttpStatus {
    type Error = DomainError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<HttpStatus> for u16 {
    fn from(status: HttpStatus) -> Self {
        status.0
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
