//! Request signing for the Timetable API
//!
//! Every request carries `devid` as its last parameter followed by
//! `signature`, the hex HMAC-SHA1 of the path and query keyed by the API key.
//! The server recomputes the same digest, so the bytes signed here must match
//! the bytes sent.

use std::fmt;

use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::warn;

use crate::config::Credentials;
use crate::query::OptionSet;

type HmacSha1 = Hmac<Sha1>;

/// A fully-qualified, signed request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl(String);

impl SignedUrl {
    /// The URL as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned URL string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the string that gets signed: path, query and trailing `devid`
#[must_use]
pub fn unsigned_request(path: &str, query: &str, developer_id: u64) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };

    let mut unsigned = String::with_capacity(path.len() + query.len() + 32);
    unsigned.push_str(path);
    unsigned.push(separator);
    if !query.is_empty() {
        unsigned.push_str(query);
        unsigned.push('&');
    }
    unsigned.push_str("devid=");
    unsigned.push_str(&developer_id.to_string());
    unsigned
}

/// Lowercase hex HMAC-SHA1 of `message` keyed by `secret`
///
/// HMAC accepts keys of any length, so the empty result is never produced
/// in practice.
#[must_use]
pub fn signature(secret: &str, message: &str) -> String {
    let Ok(mut mac) = HmacSha1::new_from_slice(secret.as_bytes()) else {
        warn!("Failed to initialize HMAC-SHA1");
        return String::new();
    };
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign `path` + encoded `query` and prefix it with `base_url`
#[must_use]
pub fn sign_url(
    base_url: &str,
    path: &str,
    query: &str,
    developer_id: u64,
    secret: &str,
) -> SignedUrl {
    let unsigned = unsigned_request(path, query, developer_id);
    let signature = signature(secret, &unsigned);
    SignedUrl(format!("{base_url}{unsigned}&signature={signature}"))
}

/// Signs request paths with a fixed set of credentials
#[derive(Debug, Clone)]
pub struct RequestSigner {
    base_url: String,
    credentials: Credentials,
}

impl RequestSigner {
    /// Create a signer; a trailing `/` on `base_url` is dropped
    #[must_use]
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Base URL every signed request is prefixed with
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Developer ID appended to every request
    #[must_use]
    pub const fn developer_id(&self) -> u64 {
        self.credentials.developer_id()
    }

    /// Encode `options` and produce the signed URL for `path`
    #[must_use]
    pub fn sign(&self, path: &str, options: &OptionSet) -> SignedUrl {
        sign_url(
            &self.base_url,
            path,
            &options.encode(),
            self.credentials.developer_id(),
            self.credentials.api_key(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN_SIGNATURE: &str = "62ed72ed2b465ecc57e47f7aa2816ee8e88fbb2c";

    fn signer(developer_id: u64, key: &str) -> RequestSigner {
        let creds = Credentials::new(developer_id, key.to_string()).unwrap();
        RequestSigner::new("https://timetableapi.ptv.vic.gov.au", creds)
    }

    #[test]
    fn test_golden_vector() {
        let unsigned = unsigned_request("/v3/route_types", "", 1);
        assert_eq!(unsigned, "/v3/route_types?devid=1");
        assert_eq!(signature("key1", &unsigned), GOLDEN_SIGNATURE);

        let url = signer(1, "key1").sign("/v3/route_types", &OptionSet::new());
        assert_eq!(
            url.as_str(),
            format!(
                "https://timetableapi.ptv.vic.gov.au/v3/route_types?devid=1&signature={GOLDEN_SIGNATURE}"
            )
        );
    }

    #[test]
    fn test_signature_with_options() {
        let options = OptionSet::new()
            .with("max_results", 5)
            .with("route_types", vec![0, 3]);
        let url = signer(3_000_123, "9c132d31-6a30-4cac-8d8b-8a1970834799")
            .sign("/v3/departures/route_type/0/stop/1181", &options);
        assert_eq!(
            url.as_str(),
            "https://timetableapi.ptv.vic.gov.au/v3/departures/route_type/0/stop/1181\
             ?max_results=5&route_types=0&route_types=3&devid=3000123\
             &signature=ab168cc4caaddc5b4866dcd13baf2a18a206a256"
        );
    }

    #[test]
    fn test_signature_accepts_any_key_length() {
        let message = "/v3/route_types?devid=1";
        assert_eq!(
            signature("", message),
            "ae49652952e940868f08944ac98726f03fa857cb"
        );
        assert_eq!(
            signature(&"k".repeat(100), message),
            "c00b13498b36ff39f5b40dfaf010a7a23ef28619"
        );
    }

    #[test]
    fn test_separator_question_mark_without_query_in_path() {
        assert_eq!(
            unsigned_request("/v3/routes", "route_types=0", 7),
            "/v3/routes?route_types=0&devid=7"
        );
    }

    #[test]
    fn test_separator_ampersand_when_path_has_query() {
        assert_eq!(
            unsigned_request("/v3/routes?route_name=x", "", 7),
            "/v3/routes?route_name=x&devid=7"
        );
        assert_eq!(
            unsigned_request("/v3/routes?route_name=x", "route_types=1", 7),
            "/v3/routes?route_name=x&route_types=1&devid=7"
        );
    }

    #[test]
    fn test_empty_query_has_no_stray_ampersand() {
        let unsigned = unsigned_request("/v3/disruptions/modes", "", 42);
        assert!(!unsigned.contains("?&"));
        assert!(!unsigned.contains("&&"));
        assert!(unsigned.ends_with("?devid=42"));
    }

    #[test]
    fn test_devid_is_last_before_signature() {
        let url = signer(99, "k").sign("/v3/outlets", &OptionSet::new().with("max_results", 3));
        let (unsigned, sig) = url.as_str().split_once("&signature=").unwrap();
        assert!(unsigned.ends_with("&devid=99"));
        assert_eq!(sig.len(), 40);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_is_hmac_key_not_message() {
        // Swapping key and message must not produce the same digest.
        let unsigned = unsigned_request("/v3/route_types", "", 1);
        assert_ne!(signature(&unsigned, "key1"), GOLDEN_SIGNATURE);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let s = signer(5, "abc");
        let options = OptionSet::new().with("expand", vec!["All"]);
        assert_eq!(s.sign("/v3/runs/1", &options), s.sign("/v3/runs/1", &options));
    }

    #[test]
    fn test_developer_id_changes_signature() {
        assert_ne!(
            signature("key1", &unsigned_request("/v3/route_types", "", 1)),
            signature("key1", &unsigned_request("/v3/route_types", "", 2))
        );
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let creds = Credentials::new(1, "key1".to_string()).unwrap();
        let signer = RequestSigner::new("http://localhost:8080/", creds);
        assert_eq!(signer.base_url(), "http://localhost:8080");
        assert!(
            signer
                .sign("/v3/route_types", &OptionSet::new())
                .as_str()
                .starts_with("http://localhost:8080/v3/route_types?devid=1")
        );
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let debug = format!("{:?}", signer(1, "do-not-print"));
        assert!(!debug.contains("do-not-print"));
    }
}
