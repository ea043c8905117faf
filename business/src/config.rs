use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use user_admin_states::StalePolicy;
use ustr::Ustr;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from environment: {0}")]
    Env(String),
    #[error("API_BASE_URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),
    #[error("REQUEST_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Client configuration for the user-admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    api_base_url: String,
    /// Bearer token attached to every request when present.
    api_token: Option<String>,
    request_timeout: Duration,
    stale_policy: StalePolicy,
}

// Intermediate struct for deserializing environment variables.
#[derive(Debug, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    request_timeout_secs: Option<u64>,
    discard_stale_events: Option<bool>,
}

impl AdminConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8080";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            api_token: None,
            request_timeout: Self::DEFAULT_TIMEOUT,
            stale_policy: StalePolicy::default(),
        }
    }

    /// Read `API_BASE_URL`, `API_TOKEN`, `REQUEST_TIMEOUT_SECS` and
    /// `DISCARD_STALE_EVENTS` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_env::from_env().map_err(|e| ConfigError::Env(e.to_string()))?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let api_base_url = raw
            .api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base_url));
        }

        let request_timeout = match raw.request_timeout_secs {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => Self::DEFAULT_TIMEOUT,
        };

        let stale_policy = if raw.discard_stale_events.unwrap_or(false) {
            StalePolicy::DiscardStale
        } else {
            StalePolicy::Apply
        };

        Ok(Self {
            api_base_url,
            api_token: raw.api_token.filter(|t| !t.trim().is_empty()),
            request_timeout,
            stale_policy,
        })
    }

    pub fn with_api_base_url(mut self, base_url: &str) -> Self {
        self.api_base_url = base_url.trim().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Base of every API route, e.g. `http://localhost:8080/api`.
    pub fn api_url(&self) -> Ustr {
        if self.api_base_url.is_empty() {
            Ustr::from("/api")
        } else {
            Ustr::from(&format!("{}/api", self.api_base_url.trim_end_matches('/')))
        }
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn stale_policy(&self) -> StalePolicy {
        self.stale_policy
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}
