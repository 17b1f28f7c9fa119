//! PTV client error types

use thiserror::Error;

/// Errors that prevent a [`crate::PtvClient`] from being constructed
#[derive(Debug, Error)]
pub enum PtvError {
    /// Credentials or client configuration are missing or invalid
    ///
    /// Raised before any network call is attempted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The credential validation request did not succeed
    #[error("Authentication failed: {0}")]
    Authentication(#[source] RequestFailure),
}

/// Outcome of a signed request that did not produce a JSON body
///
/// Returned as the `Err` side of [`crate::DispatchResult`]; never raised as a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The service answered with a status other than 200
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated for diagnostics
        body: String,
    },

    /// The transport gave up waiting for a response
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The configured timeout in seconds
        timeout_secs: u64,
    },

    /// DNS, TLS or connection-level failure
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A 200 response whose body was not valid JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl RequestFailure {
    /// HTTP status code, if the service answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the requested resource does not exist
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Returns true if repeating the same request could succeed
    ///
    /// The client itself never retries; this is a hint for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidBody(_) => false,
        }
    }
}
