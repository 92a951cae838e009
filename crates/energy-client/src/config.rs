//! Client configuration: YAML file first, environment variables on top.

use energy_core::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::ClientError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_YEAR: &str = "2023";

pub const ENV_API_URL: &str = "ENERGY_API_URL";
pub const ENV_DEFAULT_YEAR: &str = "ENERGY_DEFAULT_YEAR";
pub const ENV_LOCALE: &str = "ENERGY_LOCALE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the audit API, without trailing slash.
    pub api_url: String,
    /// Year selected when a page opens.
    pub default_year: String,
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            default_year: DEFAULT_YEAR.to_string(),
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ClientError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read `path` when given, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let base = match path {
            Some(p) => {
                debug!(path = %p.display(), "loading client config");
                Self::from_yaml_str(&fs::read_to_string(p)?)?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ENERGY_*` overrides looked up through `lookup`. Blank values
    /// are ignored.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ClientError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(year) = get(ENV_DEFAULT_YEAR) {
            self.default_year = year.trim().to_string();
        }
        if let Some(locale) = get(ENV_LOCALE) {
            self.locale = locale.parse().map_err(ClientError::Config)?;
        }
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        if self.api_url.is_empty() {
            return Err(ClientError::Config("api_url is empty".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_local_backend() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_url, "http://127.0.0.1:8000");
        assert_eq!(cfg.default_year, "2023");
        assert_eq!(cfg.locale, Locale::Fr);
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let cfg = ClientConfig::from_yaml_str("default_year: \"2024\"\nlocale: en\n").unwrap();
        assert_eq!(cfg.default_year, "2024");
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(ClientConfig::from_yaml_str("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn environment_overrides_file() {
        let cfg = ClientConfig::from_yaml_str("api_url: http://files:9000\n")
            .unwrap()
            .with_overrides(env(&[
                (ENV_API_URL, "https://audit.example.be/"),
                (ENV_DEFAULT_YEAR, " 2022 "),
                (ENV_LOCALE, ""),
            ]))
            .unwrap();
        assert_eq!(cfg.api_url, "https://audit.example.be");
        assert_eq!(cfg.default_year, "2022");
        assert_eq!(cfg.locale, Locale::Fr);
    }

    #[test]
    fn bad_locale_is_a_config_error() {
        let err = ClientConfig::default()
            .with_overrides(env(&[(ENV_LOCALE, "de")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn malformed_yaml_is_a_config_error() {
        assert!(matches!(
            ClientConfig::from_yaml_str("api_url: [unclosed"),
            Err(ClientError::Config(_))
        ));
    }
}
