//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_BACKOFF_CAP_MS, DEFAULT_CHUNK_SIZE,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_INTER_BATCH_DELAY_MS, DEFAULT_MAPPING_PATH,
    DEFAULT_MAX_RETRIES, DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_RETRY_AFTER_SECS,
    DUNKBIN_USERS_URL, TWITCH_HELIX_USERS_URL, TWITCH_TOKEN_URL,
};
use crate::errors::{DunkstatsError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dunkbin export access.
    pub dunkbin: DunkbinConfig,
    /// Twitch application and tokens.
    pub twitch: TwitchConfig,
    /// Batch fetch tuning.
    pub fetch: FetchConfig,
    /// Artifact output.
    pub output: OutputConfig,
}

/// Dunkbin export credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DunkbinConfig {
    /// Users export endpoint.
    pub users_url: String,
    /// Basic-auth user.
    pub username: String,
    /// Basic-auth password.
    #[serde(skip_serializing)]
    pub password: String,
}

/// Twitch application credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchConfig {
    /// Application client id, sent as `Client-Id`.
    pub client_id: String,
    /// Client secret; enables the `client_credentials` grant.
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,
    /// Initial bearer token.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Initial refresh token.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// OAuth token endpoint.
    pub token_url: String,
    /// Helix `GET /users` endpoint.
    pub helix_users_url: String,
}

/// Batch fetch tuning
///
/// The rate-limit default and the set of statuses treated as credential
/// failures are upstream quirks of the Helix API, kept configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Logins per lookup request.
    pub chunk_size: usize,
    /// Retries per request after the first attempt.
    pub max_retries: u32,
    /// Pause between chunks.
    pub inter_batch_delay_ms: u64,
    /// Wait after a 429 without `Retry-After`.
    pub default_retry_after_secs: u64,
    /// Statuses that trigger a credential refresh.
    pub auth_failure_statuses: Vec<u16>,
    /// First backoff delay.
    pub backoff_base_ms: u64,
    /// Largest backoff delay.
    pub backoff_cap_ms: u64,
    /// Refresh credentials expiring within this many seconds.
    pub refresh_threshold_secs: i64,
    /// Per-request HTTP timeout.
    pub http_timeout_secs: u64,
}

/// Artifact output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Artifact path before any `.gz` suffix.
    pub mapping_path: String,
    /// Write gzip instead of plain JSON.
    pub compress: bool,
}

impl Default for DunkbinConfig {
    fn default() -> Self {
        Self { users_url: DUNKBIN_USERS_URL.to_string(), username: String::new(), password: String::new() }
    }
}

impl Default for TwitchConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            access_token: None,
            refresh_token: None,
            token_url: TWITCH_TOKEN_URL.to_string(),
            helix_users_url: TWITCH_HELIX_USERS_URL.to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            inter_batch_delay_ms: DEFAULT_INTER_BATCH_DELAY_MS,
            default_retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
            auth_failure_statuses: vec![400, 401],
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
            backoff_cap_ms: DEFAULT_BACKOFF_CAP_MS,
            refresh_threshold_secs: DEFAULT_REFRESH_THRESHOLD_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { mapping_path: DEFAULT_MAPPING_PATH.to_string(), compress: true }
    }
}

impl FetchConfig {
    /// Pause between chunks as a `Duration`.
    pub fn inter_batch_delay(&self) -> Duration {
        Duration::from_millis(self.inter_batch_delay_ms)
    }

    /// HTTP timeout as a `Duration`.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Reject values the fetch pipeline cannot run with.
    ///
    /// # Errors
    /// Returns `DunkstatsError::Config` for a zero chunk size or an inverted
    /// backoff range.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DunkstatsError::Config("chunk_size must be greater than 0".into()));
        }
        if self.backoff_cap_ms < self.backoff_base_ms {
            return Err(DunkstatsError::Config(format!(
                "backoff_cap_ms ({}) must not be below backoff_base_ms ({})",
                self.backoff_cap_ms, self.backoff_base_ms
            )));
        }
        Ok(())
    }
}

impl TwitchConfig {
    /// Whether some way to obtain a bearer token exists.
    pub fn can_authenticate(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        present(&self.access_token) || present(&self.refresh_token) || present(&self.client_secret)
    }
}

impl Config {
    /// Validate the full configuration.
    ///
    /// # Errors
    /// Returns `DunkstatsError::Config` naming the first missing or invalid
    /// setting.
    pub fn validate(&self) -> Result<()> {
        if self.dunkbin.username.is_empty() || self.dunkbin.password.is_empty() {
            return Err(DunkstatsError::Config("Dunkbin username and password are required".into()));
        }
        if self.twitch.client_id.is_empty() {
            return Err(DunkstatsError::Config("Twitch client id is required".into()));
        }
        if !self.twitch.can_authenticate() {
            return Err(DunkstatsError::Config(
                "one of Twitch access token, refresh token or client secret is required".into(),
            ));
        }
        self.fetch.validate()
    }
}
