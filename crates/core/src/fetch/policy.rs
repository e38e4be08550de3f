//! Retry decision policy
//!
//! [`RetryPolicy::next_action`] is a pure function of the outcome and the
//! number of retries already spent, so every transition can be tested
//! without a network or a clock.

use std::time::Duration;

use dunkstats_common::BackoffStrategy;
use dunkstats_domain::{DunkstatsError, FetchConfig, FetchOutcome, NextAction};

/// Retry budget and delays for one logical request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    default_retry_after: Duration,
    backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy from explicit limits.
    pub fn new(max_retries: u32, default_retry_after: Duration, backoff: BackoffStrategy) -> Self {
        Self { max_retries, default_retry_after, backoff }
    }

    /// Policy with the configured retry budget, backoff and rate-limit default.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_secs(config.default_retry_after_secs),
            BackoffStrategy::capped_exponential(
                Duration::from_millis(config.backoff_base_ms),
                Duration::from_millis(config.backoff_cap_ms),
            ),
        )
    }

    /// Copy of this policy with a different retry budget.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the next retry when `retries_so_far` retries were spent.
    pub fn backoff_delay(&self, retries_so_far: u32) -> Duration {
        self.backoff.calculate_delay(retries_so_far.saturating_add(1))
    }

    /// Decide what to do with `outcome`.
    ///
    /// `retries_so_far` is zero for the first response of a request.
    pub fn next_action<T>(&self, outcome: FetchOutcome<T>, retries_so_far: u32) -> NextAction<T> {
        let can_retry = retries_so_far < self.max_retries;
        let attempts = retries_so_far.saturating_add(1);

        match outcome {
            FetchOutcome::Success(payload) => NextAction::Accept(payload),
            FetchOutcome::RateLimited { retry_after_secs } => {
                if can_retry {
                    NextAction::Retry(
                        retry_after_secs.map_or(self.default_retry_after, Duration::from_secs),
                    )
                } else {
                    NextAction::GiveUp(DunkstatsError::RateLimitExceeded(format!(
                        "still rate limited after {attempts} attempts"
                    )))
                }
            }
            FetchOutcome::AuthExpired { status } => {
                if can_retry {
                    NextAction::RefreshAndRetry
                } else {
                    NextAction::GiveUp(DunkstatsError::Auth(format!(
                        "credential rejected with status {status} after {attempts} attempts"
                    )))
                }
            }
            FetchOutcome::ServerError { status } => {
                if can_retry {
                    NextAction::Retry(self.backoff_delay(retries_so_far))
                } else {
                    NextAction::GiveUp(DunkstatsError::ServerUnavailable(format!(
                        "status {status} after {attempts} attempts"
                    )))
                }
            }
            FetchOutcome::ClientError { status } => NextAction::GiveUp(
                DunkstatsError::MalformedRequest(format!("request rejected with status {status}")),
            ),
            FetchOutcome::NetworkError { message } => {
                if can_retry {
                    NextAction::Retry(self.backoff_delay(retries_so_far))
                } else {
                    NextAction::GiveUp(DunkstatsError::NetworkFailure(format!(
                        "{message} (after {attempts} attempts)"
                    )))
                }
            }
        }
    }
}

/// Maps non-success HTTP statuses to outcomes.
///
/// Which statuses count as an expired credential is upstream-specific: Helix
/// answers 400 as well as 401 for a bad token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseClassifier {
    auth_failure_statuses: Vec<u16>,
}

impl ResponseClassifier {
    /// Classifier treating `auth_failure_statuses` as credential failures.
    pub fn new(auth_failure_statuses: Vec<u16>) -> Self {
        Self { auth_failure_statuses }
    }

    /// Classifier with no credential-failure statuses (basic-auth endpoints).
    pub fn without_auth_refresh() -> Self {
        Self::new(Vec::new())
    }

    /// Classifier using the configured auth-failure statuses.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.auth_failure_statuses.clone())
    }

    /// Classify a non-success status.
    pub fn classify_failure<T>(&self, status: u16, retry_after_secs: Option<u64>) -> FetchOutcome<T> {
        if status == 429 {
            FetchOutcome::RateLimited { retry_after_secs }
        } else if self.auth_failure_statuses.contains(&status) {
            FetchOutcome::AuthExpired { status }
        } else if status >= 500 {
            FetchOutcome::ServerError { status }
        } else {
            FetchOutcome::ClientError { status }
        }
    }
}
