//! Request dispatch and response classification
//!
//! [`HttpTransport`] is the only place that touches the network.
//! [`RequestDispatcher`] turns whatever it returns into a [`DispatchResult`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::PtvConfig;
use crate::error::{PtvError, RequestFailure};
use crate::signing::SignedUrl;

/// Parsed JSON on status 200, a classified failure otherwise
pub type DispatchResult = Result<Value, RequestFailure>;

/// Raw status and body returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

/// Failure below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// No response within the configured timeout
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
    /// DNS, TLS, or connection failure
    Connection(String),
}

/// Performs a single HTTP GET
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetch `url` once; no retries
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by a pooled `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    /// Build the HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &PtvConfig) -> Result<Self, PtvError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| PtvError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    fn map_error(&self, error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            TransportError::Connection(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(&e))?;

        let status = response.status().as_u16();
        let body = if status == 200 {
            response.text().await
        } else {
            read_capped(response, MAX_ERROR_BODY_BYTES).await
        }
        .map_err(|e| self.map_error(&e))?;

        Ok(TransportResponse { status, body })
    }
}

/// Bytes kept from a non-200 body; the rest is never read
const MAX_ERROR_BODY_BYTES: usize = 4096;

async fn read_capped(mut response: Response, limit: usize) -> reqwest::Result<String> {
    let mut buf = Vec::with_capacity(limit.min(1024));
    while buf.len() < limit {
        let Some(chunk) = response.chunk().await? else {
            break;
        };
        let take = chunk.len().min(limit - buf.len());
        buf.extend_from_slice(&chunk[..take]);
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Issues signed requests and classifies the outcome
#[derive(Clone)]
pub struct RequestDispatcher {
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher").finish_non_exhaustive()
    }
}

impl RequestDispatcher {
    /// Create a dispatcher over the given transport
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Perform exactly one GET for `url`
    #[instrument(skip(self, url))]
    pub async fn dispatch(&self, url: &SignedUrl) -> DispatchResult {
        match self.transport.get(url.as_str()).await {
            Ok(response) => classify(response),
            Err(TransportError::Timeout { timeout_secs }) => {
                warn!(timeout_secs, "Request timed out");
                Err(RequestFailure::Timeout { timeout_secs })
            },
            Err(TransportError::Connection(reason)) => {
                warn!(%reason, "Request could not be sent");
                Err(RequestFailure::ConnectionFailed(reason))
            },
        }
    }
}

/// Map a raw response onto success or a status failure
fn classify(response: TransportResponse) -> DispatchResult {
    if response.status != 200 {
        warn!(status = response.status, "Request rejected");
        return Err(RequestFailure::Status {
            status: response.status,
            body: truncate_body(&response.body),
        });
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| RequestFailure::InvalidBody(e.to_string()))?;

    debug!("Request succeeded");
    Ok(value)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
