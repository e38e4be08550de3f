//! Fetch pipeline types
//!
//! A single HTTP call produces a [`FetchOutcome`]; the retry policy turns it
//! into a [`NextAction`]; the orchestrator aggregates accepted payloads into
//! a [`FetchReport`].

use std::time::Duration;

use serde::Serialize;

use crate::errors::DunkstatsError;
use crate::types::twitch::TwitchUser;

/// One bounded slice of identifiers sent to the bulk lookup endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Zero-based position of the chunk in the plan.
    pub chunk_index: usize,
    pub identifiers: Vec<String>,
    /// Number of attempts already made for this chunk.
    pub attempt: u32,
}

impl BatchRequest {
    /// Request for a chunk that has not been attempted yet.
    pub fn new(chunk_index: usize, identifiers: Vec<String>) -> Self {
        Self { chunk_index, identifiers, attempt: 0 }
    }
}

/// Classified result of one HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Accepted payload.
    Success(T),
    /// HTTP 429, with the server's `Retry-After` in seconds when provided.
    RateLimited { retry_after_secs: Option<u64> },
    /// Status configured as a credential failure (401, and 400 for Helix).
    AuthExpired { status: u16 },
    /// HTTP 5xx.
    ServerError { status: u16 },
    /// Any other non-success status.
    ClientError { status: u16 },
    /// Transport failure before a status was received.
    NetworkError { message: String },
}

impl<T> FetchOutcome<T> {
    /// Short label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::RateLimited { .. } => "rate_limited",
            Self::AuthExpired { .. } => "auth_expired",
            Self::ServerError { .. } => "server_error",
            Self::ClientError { .. } => "client_error",
            Self::NetworkError { .. } => "network_error",
        }
    }

    /// Transform the success payload, keeping every failure as is.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Success(payload) => FetchOutcome::Success(f(payload)),
            Self::RateLimited { retry_after_secs } => FetchOutcome::RateLimited { retry_after_secs },
            Self::AuthExpired { status } => FetchOutcome::AuthExpired { status },
            Self::ServerError { status } => FetchOutcome::ServerError { status },
            Self::ClientError { status } => FetchOutcome::ClientError { status },
            Self::NetworkError { message } => FetchOutcome::NetworkError { message },
        }
    }
}

/// Decision taken for an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum NextAction<T> {
    /// Wait, then try again with the same credential.
    Retry(Duration),
    /// Refresh the credential, then try again.
    RefreshAndRetry,
    /// Stop; the chunk is recorded as failed.
    GiveUp(DunkstatsError),
    /// Keep the payload.
    Accept(T),
}

/// A chunk that exhausted its retries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub chunk_index: usize,
    pub identifiers: Vec<String>,
    pub error: DunkstatsError,
}

/// Aggregate result of a batch fetch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchReport {
    pub records: Vec<TwitchUser>,
    /// Identifiers that were not resolved to a record, from failed chunks
    /// and from accepted chunks that omitted them.
    pub unresolved_count: usize,
    pub failures: Vec<BatchFailure>,
}

impl FetchReport {
    /// Whether every chunk was accepted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_only_touches_success() {
        let ok: FetchOutcome<Vec<u8>> = FetchOutcome::Success(vec![1, 2, 3]);
        assert_eq!(ok.map(|bytes| bytes.len()), FetchOutcome::Success(3));

        let limited: FetchOutcome<Vec<u8>> = FetchOutcome::RateLimited { retry_after_secs: Some(5) };
        assert_eq!(limited.map(|bytes| bytes.len()), FetchOutcome::RateLimited { retry_after_secs: Some(5) });
    }

    #[test]
    fn report_is_complete_without_failures() {
        let mut report = FetchReport { unresolved_count: 2, ..FetchReport::default() };
        assert!(report.is_complete());

        report.failures.push(BatchFailure {
            chunk_index: 1,
            identifiers: vec!["a".into()],
            error: DunkstatsError::RateLimitExceeded("retries exhausted".into()),
        });
        assert!(!report.is_complete());
    }
}
