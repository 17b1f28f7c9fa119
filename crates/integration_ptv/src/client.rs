//! Signed PTV Timetable API client
//!
//! Construction validates the credentials with one cheap request; a
//! [`PtvClient`] value therefore always holds credentials the API accepted.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::{Credentials, PtvConfig};
use crate::dispatch::{DispatchResult, HttpTransport, ReqwestTransport, RequestDispatcher};
use crate::error::PtvError;
use crate::query::OptionSet;
use crate::signing::{RequestSigner, SignedUrl};

/// Side-effect-free endpoint used to validate credentials
pub const VALIDATION_PATH: &str = "/v3/route_types";

/// Client for the PTV Timetable API v3
///
/// Immutable after construction and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct PtvClient {
    signer: RequestSigner,
    dispatcher: RequestDispatcher,
}

impl PtvClient {
    /// Build a client over `reqwest` and validate the credentials
    ///
    /// # Errors
    ///
    /// Returns [`PtvError::Configuration`] if the configuration is invalid and
    /// [`PtvError::Authentication`] if the validation request fails.
    pub async fn connect(config: &PtvConfig, credentials: Credentials) -> Result<Self, PtvError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(config, credentials, Arc::new(transport)).await
    }

    /// Build a client over a custom transport and validate the credentials
    ///
    /// # Errors
    ///
    /// Same as [`PtvClient::connect`].
    #[instrument(skip_all, fields(developer_id = credentials.developer_id()))]
    pub async fn with_transport(
        config: &PtvConfig,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, PtvError> {
        config.validate()?;

        let client = Self {
            signer: RequestSigner::new(&config.base_url, credentials),
            dispatcher: RequestDispatcher::new(transport),
        };

        match client.get(VALIDATION_PATH, &OptionSet::new()).await {
            Ok(_) => {
                info!("PTV credentials accepted");
                Ok(client)
            },
            Err(failure) => {
                warn!(%failure, "PTV credentials rejected");
                Err(PtvError::Authentication(failure))
            },
        }
    }

    /// Developer ID the client signs with
    #[must_use]
    pub const fn developer_id(&self) -> u64 {
        self.signer.developer_id()
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.signer.base_url()
    }

    /// Produce the signed URL for `path` without sending it
    #[must_use]
    pub fn sign(&self, path: &str, options: &OptionSet) -> SignedUrl {
        self.signer.sign(path, options)
    }

    /// Sign and send one GET for `path`
    ///
    /// `path` must already contain its resolved segments, e.g.
    /// `/v3/stops/1071/route_type/0`.
    #[instrument(skip(self, options), fields(options = options.len()))]
    pub async fn get(&self, path: &str, options: &OptionSet) -> DispatchResult {
        let url = self.signer.sign(path, options);
        debug!("Dispatching signed request");
        self.dispatcher.dispatch(&url).await
    }
}
