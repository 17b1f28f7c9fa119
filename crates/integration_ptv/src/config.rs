//! PTV client configuration and credentials

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::PtvError;

/// Connection settings for the PTV Timetable API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtvConfig {
    /// Base URL for the Timetable API, without the `/v3` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://timetableapi.ptv.vic.gov.au".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("ptv-client/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for PtvConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl PtvConfig {
    /// Create a configuration pointing at a mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), PtvError> {
        if self.base_url.trim().is_empty() {
            return Err(PtvError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(PtvError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Developer ID and signing key issued by PTV
///
/// Immutable once built. The key is only exposed to the signer.
#[derive(Clone)]
pub struct Credentials {
    developer_id: u64,
    api_key: SecretString,
}

impl Credentials {
    /// Build credentials, rejecting a blank key or a zero developer ID
    ///
    /// # Errors
    ///
    /// Returns [`PtvError::Configuration`] if either value is missing.
    pub fn new(developer_id: u64, api_key: impl Into<SecretString>) -> Result<Self, PtvError> {
        let api_key = api_key.into();

        if developer_id == 0 {
            return Err(PtvError::Configuration(
                "developer id is missing".to_string(),
            ));
        }

        if api_key.expose_secret().trim().is_empty() {
            return Err(PtvError::Configuration("api key is missing".to_string()));
        }

        Ok(Self {
            developer_id,
            api_key,
        })
    }

    /// Numeric developer account ID
    #[must_use]
    pub const fn developer_id(&self) -> u64 {
        self.developer_id
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("developer_id", &self.developer_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
