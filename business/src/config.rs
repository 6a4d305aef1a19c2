use std::time::Duration;

use serde::Deserialize;
use ustr::Ustr;

use crate::error::{AdminApiError, ApiResult};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the platform's REST API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BusinessConfig {
    /// Instance origin, e.g. `https://videos.example.org`.
    #[serde(rename = "url")]
    pub api_base_url: String,

    /// OAuth bearer token of the operator.
    #[serde(rename = "token", default)]
    pub access_token: Option<String>,

    /// Per-request timeout applied by the HTTP client.
    #[serde(rename = "timeout_secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize)]
struct EnvConfig {
    tube_admin: BusinessConfig,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            access_token: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Deserialize from `TUBE_ADMIN_URL`, `TUBE_ADMIN_TOKEN` and
    /// `TUBE_ADMIN_TIMEOUT_SECS` pairs, e.g. `std::env::vars()`.
    pub fn from_vars<I, S>(vars: I) -> ApiResult<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let env: EnvConfig = serde_env::from_iter(vars)
            .map_err(|e| AdminApiError::Config(format!("environment: {e}")))?;
        Ok(env.tube_admin)
    }

    /// Base of the versioned REST API, without a trailing slash.
    pub fn api_url(&self) -> Ustr {
        let base = self.api_base_url.trim_end_matches('/');
        Ustr::from(format!("{base}/api/v1").as_str())
    }

    /// `host[:port]` of the instance, used to build `username@host` handles.
    pub fn api_host(&self) -> ApiResult<Ustr> {
        let url = reqwest::Url::parse(&self.api_base_url)
            .map_err(|e| AdminApiError::Config(format!("invalid url {}: {e}", self.api_base_url)))?;
        let host = url
            .host_str()
            .ok_or_else(|| AdminApiError::Config(format!("url has no host: {}", self.api_base_url)))?;

        Ok(match url.port() {
            Some(port) => Ustr::from(format!("{host}:{port}").as_str()),
            None => Ustr::from(host),
        })
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_strips_trailing_slash() {
        let config = BusinessConfig::new("https://videos.example.org/");
        assert_eq!(config.api_url(), Ustr::from("https://videos.example.org/api/v1"));
    }

    #[test]
    fn test_api_host_keeps_explicit_port() {
        let config = BusinessConfig::new("http://127.0.0.1:9000");
        assert_eq!(config.api_host().unwrap(), Ustr::from("127.0.0.1:9000"));

        let config = BusinessConfig::new("https://videos.example.org");
        assert_eq!(config.api_host().unwrap(), Ustr::from("videos.example.org"));
    }

    #[test]
    fn test_api_host_rejects_garbage() {
        let config = BusinessConfig::new("not a url");
        assert!(matches!(config.api_host(), Err(AdminApiError::Config(_))));
    }

    #[test]
    fn test_from_vars() {
        let config = BusinessConfig::from_vars(vec![
            ("TUBE_ADMIN_URL", "https://videos.example.org"),
            ("TUBE_ADMIN_TOKEN", "secret"),
        ])
        .expect("config should deserialize");

        assert_eq!(config.api_base_url, "https://videos.example.org");
        assert_eq!(config.access_token(), Some("secret"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_from_vars_reads_timeout() {
        let config = BusinessConfig::from_vars(vec![
            ("TUBE_ADMIN_URL", "https://videos.example.org"),
            ("TUBE_ADMIN_TIMEOUT_SECS", "5"),
        ])
        .expect("config should deserialize");

        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.access_token(), None);
    }

    #[test]
    fn test_from_vars_requires_url() {
        let result = BusinessConfig::from_vars(vec![("TUBE_ADMIN_TOKEN", "secret")]);
        assert!(result.is_err());
    }
}
