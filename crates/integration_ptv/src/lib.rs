//! Public Transport Victoria Timetable API client
//!
//! The Timetable API authenticates each request with a URL signature instead
//! of a bearer token: every path carries the caller's `devid` and a hex
//! HMAC-SHA1 of the path and query keyed by the developer's API key.
//!
//! # Architecture
//!
//! - [`OptionSet`] encodes query options into a canonical query string.
//! - [`RequestSigner`] appends `devid` and computes `signature`.
//! - [`RequestDispatcher`] sends one GET through an [`HttpTransport`] and
//!   classifies the response into a [`DispatchResult`].
//! - [`PtvClient`] ties them together and checks the credentials once at
//!   construction, so every client value holds credentials the API accepted.
//!
//! Response bodies are returned as untyped [`serde_json::Value`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_ptv::{Credentials, PtvClient, PtvConfig, RouteType, SearchOptions};
//!
//! let credentials = Credentials::new(3000123, api_key)?;
//! let client = PtvClient::connect(&PtvConfig::default(), credentials).await?;
//!
//! let options = SearchOptions {
//!     route_types: vec![RouteType::Train],
//!     ..Default::default()
//! };
//! match client.search("South Yarra", &options).await {
//!     Ok(body) => println!("{body}"),
//!     Err(failure) if failure.is_retryable() => { /* try again later */ }
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! ```

mod client;
mod config;
mod dispatch;
mod error;
mod models;
mod operations;
mod query;
mod signing;

pub use client::{PtvClient, VALIDATION_PATH};
pub use config::{Credentials, PtvConfig};
pub use dispatch::{
    DispatchResult, HttpTransport, ReqwestTransport, RequestDispatcher, TransportError,
    TransportResponse,
};
pub use error::{PtvError, RequestFailure};
pub use models::{DisruptionStatus, Expand, RouteType};
pub use operations::{
    DeparturesOptions, DisruptionStatusOptions, DisruptionsOptions, FareEstimateOptions,
    OutletsOptions, PatternOptions, QueryOptions, RouteOptions, RoutesOptions, RunsOptions,
    SearchOptions, StopDetailsOptions, StopsNearbyOptions, StopsOnRouteOptions,
};
pub use query::{OptionSet, OptionValue, Scalar, path_segment};
pub use signing::{RequestSigner, SignedUrl, sign_url, signature, unsigned_request};
