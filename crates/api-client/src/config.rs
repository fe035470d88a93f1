//! Configuration for the Erply API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::bulk::MAX_BULK_REQUESTS;
use crate::error::{ApiError, ApiResult};
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Customer account number, also used to derive the API host
    pub client_code: String,
    /// Session key obtained from `verifyUser`
    pub session_key: Option<String>,
    /// Explicit API URL; derived from `client_code` when unset
    pub api_url: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// Transport retry configuration
    pub retry: RetryConfig,
    /// Maximum number of operations in one bulk request
    pub max_bulk_requests: usize,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_code: String::new(),
            session_key: None,
            api_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            max_bulk_requests: MAX_BULK_REQUESTS,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for an account
    pub fn new(client_code: impl Into<String>) -> Self {
        Self {
            client_code: client_code.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `ERPLY_CLIENT_CODE`: Customer account number (required)
    /// - `ERPLY_SESSION_KEY`: Session key for authenticated calls
    /// - `ERPLY_API_URL`: API URL override
    /// - `ERPLY_TIMEOUT_SECS`: Request timeout in seconds
    /// - `ERPLY_MAX_BULK_REQUESTS`: Bulk request ceiling
    pub fn from_env() -> ApiResult<Self> {
        let client_code =
            env::var("ERPLY_CLIENT_CODE").map_err(|_| ApiError::missing_env("ERPLY_CLIENT_CODE"))?;

        let session_key = env::var("ERPLY_SESSION_KEY").ok().filter(|s| !s.is_empty());
        let api_url = env::var("ERPLY_API_URL").ok().filter(|s| !s.is_empty());

        let timeout = env::var("ERPLY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map_or(Duration::from_secs(30), Duration::from_secs);

        let max_bulk_requests = env::var("ERPLY_MAX_BULK_REQUESTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(MAX_BULK_REQUESTS);

        Ok(Self {
            client_code,
            session_key,
            api_url,
            timeout,
            retry: RetryConfig::default(),
            max_bulk_requests,
        })
    }

    /// URL every request is posted to
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        match &self.api_url {
            Some(url) => url.clone(),
            None => format!("https://{}.erply.com/api/", self.client_code),
        }
    }

    /// Builder-style method to set the session key
    #[must_use]
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = Some(key.into());
        self
    }

    /// Builder-style method to set the API URL
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set retry config
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Builder-style method to set the bulk request ceiling
    #[must_use]
    pub fn with_max_bulk_requests(mut self, max: usize) -> Self {
        self.max_bulk_requests = max;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.client_code.is_empty() {
            return Err(ApiError::config("client_code cannot be empty"));
        }

        if !self
            .client_code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ApiError::config(
                "client_code may only contain letters, digits and '-'",
            ));
        }

        let url = self.endpoint_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(url));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.max_bulk_requests == 0 {
            return Err(ApiError::config("max_bulk_requests cannot be zero"));
        }

        if self.retry.max_attempts == 0 {
            return Err(ApiError::config("retry.max_attempts must be at least 1"));
        }

        Ok(())
    }
}
