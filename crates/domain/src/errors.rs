//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Dunkstats
///
/// Every variant carries a plain message so the error is `Clone`; a shared
/// token refresh hands the same failure to all of its waiters.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DunkstatsError {
    /// Credential missing, rejected or not refreshable.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Still rate limited after every retry.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server errors outlasted the retry budget.
    #[error("Server unavailable: {0}")]
    ServerUnavailable(String),

    /// Non-retryable client error.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Transport failure outlasted the retry budget.
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(String),

    /// Encoding or decoding failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DunkstatsError {
    /// Stable label suitable for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::RateLimitExceeded(_) => "rate_limit_exceeded",
            Self::ServerUnavailable(_) => "server_unavailable",
            Self::MalformedRequest(_) => "malformed_request",
            Self::NetworkFailure(_) => "network_failure",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Dunkstats operations
pub type Result<T> = std::result::Result<T, DunkstatsError>;
