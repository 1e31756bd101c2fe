//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use url::Url;

use crate::form::challenge::DEFAULT_SITE_KEY;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Site hosting the validation route (default: http://localhost:8080).
    pub endpoint_url: Url,

    /// Lowercase two-letter country code sent with every request (default: "fi").
    pub country_code: String,

    /// Per-request timeout (default: 30s).
    pub request_timeout: Duration,

    /// Challenge widget site key.
    pub site_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint_url = var("VAT_ENDPOINT_URL")
            .unwrap_or_else(|| "http://localhost:8080".to_string());
        let endpoint_url = parse_endpoint_url(&endpoint_url)?;

        let country_code = var("VAT_COUNTRY_CODE").unwrap_or_else(|| "fi".to_string());
        let country_code = parse_country_code(&country_code)?;

        let request_timeout = var("VAT_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .context("VAT_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        let site_key = var("TURNSTILE_SITE_KEY").unwrap_or_else(|| DEFAULT_SITE_KEY.to_string());

        Ok(Self {
            endpoint_url,
            country_code,
            request_timeout,
            site_key,
        })
    }
}

/// Parse and check the endpoint base URL.
pub fn parse_endpoint_url(value: &str) -> Result<Url> {
    let url = Url::parse(value).with_context(|| format!("invalid endpoint URL: {value}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => bail!("unsupported endpoint URL scheme: {scheme}"),
    }
}

/// Normalize a country code to two lowercase ASCII letters.
pub fn parse_country_code(value: &str) -> Result<String> {
    let code = value.trim().to_ascii_lowercase();
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_lowercase()) {
        bail!("country code must be two ASCII letters, got {value:?}");
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.endpoint_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.country_code, "fi");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.site_key, DEFAULT_SITE_KEY);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("VAT_ENDPOINT_URL", "https://example.fi"),
            ("VAT_COUNTRY_CODE", "SE"),
            ("VAT_REQUEST_TIMEOUT_SECS", "5"),
            ("TURNSTILE_SITE_KEY", "1x00000000000000000000AA"),
        ])
        .unwrap();
        assert_eq!(config.endpoint_url.as_str(), "https://example.fi/");
        assert_eq!(config.country_code, "se");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.site_key, "1x00000000000000000000AA");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("VAT_ENDPOINT_URL", "ftp://example.fi")]).is_err());
        assert!(load(&[("VAT_ENDPOINT_URL", "not a url")]).is_err());
        assert!(load(&[("VAT_COUNTRY_CODE", "fin")]).is_err());
        assert!(load(&[("VAT_COUNTRY_CODE", "f1")]).is_err());
        assert!(load(&[("VAT_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
