//! CLI settings
//!
//! Loaded from built-in defaults, then an optional TOML file, then `PTV_*`
//! environment variables (e.g. `PTV_DEVELOPER_ID`, `PTV_API_KEY`).

use std::path::Path;

use anyhow::Context;
use config::{Config, ConfigError, Environment, File};
use integration_ptv::{Credentials, PtvConfig};
use secrecy::SecretString;
use serde::Deserialize;

/// Default settings file name, looked up in the working directory
const DEFAULT_FILE: &str = "ptv";

/// Settings resolved from file and environment
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Developer ID issued by PTV
    #[serde(default)]
    pub developer_id: Option<u64>,

    /// API key issued by PTV
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Timetable API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Settings {
    /// Load settings from `path` (or `./ptv.toml` if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix("PTV").try_parsing(true))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = PtvConfig::default();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_FILE).required(false),
        };

        Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    /// Split into client configuration and credentials
    pub fn into_parts(self) -> anyhow::Result<(PtvConfig, Credentials)> {
        let config = PtvConfig {
            base_url: self.base_url,
            timeout_secs: self.timeout_secs,
            ..PtvConfig::default()
        };
        config.validate().context("invalid client settings")?;

        let credentials = Credentials::new(
            self.developer_id.unwrap_or_default(),
            self.api_key.unwrap_or_else(|| SecretString::from("")),
        )
        .context("set PTV_DEVELOPER_ID and PTV_API_KEY or add them to ptv.toml")?;

        Ok((config, credentials))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use config::Map;
    use secrecy::ExposeSecret;

    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix("PTV")
            .try_parsing(true)
            .source(Some(Map::new()))
    }

    fn env_of(pairs: &[(&str, &str)]) -> Environment {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix("PTV")
            .try_parsing(true)
            .source(Some(map))
    }

    fn write_toml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file_or_env() {
        let settings = Settings::load_with_env(None, no_env()).unwrap();
        assert!(settings.developer_id.is_none());
        assert!(settings.api_key.is_none());
        assert_eq!(settings.base_url, "https://timetableapi.ptv.vic.gov.au");
        assert_eq!(settings.timeout_secs, 10);
    }

    #[test]
    fn file_values_are_loaded() {
        let file = write_toml(
            r#"
            developer_id = 3000123
            api_key = "9c132d31-6a30-4cac-8d8b-8a1970834799"
            timeout_secs = 3
            "#,
        );

        let settings = Settings::load_with_env(Some(file.path()), no_env()).unwrap();
        assert_eq!(settings.developer_id, Some(3_000_123));
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(
            settings.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("9c132d31-6a30-4cac-8d8b-8a1970834799")
        );
    }

    #[test]
    fn env_overrides_file() {
        let file = write_toml("developer_id = 1\nbase_url = \"http://from-file\"\n");
        let env = env_of(&[
            ("PTV_DEVELOPER_ID", "42"),
            ("PTV_BASE_URL", "http://from-env"),
            ("PTV_API_KEY", "secret"),
        ]);

        let settings = Settings::load_with_env(Some(file.path()), env).unwrap();
        assert_eq!(settings.developer_id, Some(42));
        assert_eq!(settings.base_url, "http://from-env");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Settings::load_with_env(Some(&path), no_env()).is_err());
    }

    #[test]
    fn into_parts_requires_credentials() {
        let settings = Settings::load_with_env(None, no_env()).unwrap();
        let err = settings.into_parts().unwrap_err();
        assert!(format!("{err:#}").contains("developer id is missing"));
    }

    #[test]
    fn into_parts_builds_config_and_credentials() {
        let env = env_of(&[
            ("PTV_DEVELOPER_ID", "3000123"),
            ("PTV_API_KEY", "key"),
            ("PTV_TIMEOUT_SECS", "4"),
        ]);
        let settings = Settings::load_with_env(None, env).unwrap();

        let (config, credentials) = settings.into_parts().unwrap();
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(credentials.developer_id(), 3_000_123);
    }

    #[test]
    fn debug_redacts_api_key() {
        let env = env_of(&[("PTV_DEVELOPER_ID", "1"), ("PTV_API_KEY", "do-not-print")]);
        let settings = Settings::load_with_env(None, env).unwrap();
        assert!(!format!("{settings:?}").contains("do-not-print"));
    }
}
