//! Retrying fetcher
//!
//! Drives one logical request through the retry policy. Each call to the
//! transport yields a [`FetchOutcome`]; the policy maps it to a
//! [`NextAction`]; the driver performs the effect (wait on the clock,
//! refresh the credential) and loops until the payload is accepted or the
//! request is given up.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dunkstats_common::{Clock, SystemClock};
use dunkstats_domain::{
    BatchRequest, DunkstatsError, FetchOutcome, NextAction, Result, TwitchUser,
};
use tracing::{debug, warn};

use super::policy::RetryPolicy;
use super::ports::UserLookup;
use crate::auth::TokenRefresher;

/// Driver states.
#[derive(Debug)]
enum DriveState<T> {
    Attempting,
    Waiting(Duration),
    RefreshingCredential,
    Accepted(T),
    GivenUp(DunkstatsError),
}

/// Retry driver shared by the batch and single-resource fetches.
#[derive(Clone)]
pub struct RetryingFetcher {
    policy: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher").field("policy", &self.policy).finish_non_exhaustive()
    }
}

impl Default for RetryingFetcher {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), Arc::new(SystemClock))
    }
}

impl RetryingFetcher {
    /// Create a fetcher that waits through `clock`.
    pub fn new(policy: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self { policy, clock }
    }

    /// Retry policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Look up one chunk of logins, refreshing the credential on auth
    /// failures.
    ///
    /// `request.attempt` is incremented for every call made.
    ///
    /// # Errors
    /// The error of the [`NextAction::GiveUp`] that ended the request, or
    /// the refresh error when a credential refresh failed.
    pub async fn fetch_batch(
        &self,
        lookup: &dyn UserLookup,
        refresher: &TokenRefresher,
        request: &mut BatchRequest,
    ) -> Result<Vec<TwitchUser>> {
        let identifiers = request.identifiers.as_slice();
        let store = refresher.store().as_ref();
        let call = move || async move {
            match store.current() {
                Some(credential) => lookup.lookup_users(identifiers, &credential).await,
                None => FetchOutcome::AuthExpired { status: 401 },
            }
        };

        let mut attempt = request.attempt;
        let result =
            self.drive("user_lookup", Some(request.chunk_index), &mut attempt, Some(refresher), call)
                .await;
        request.attempt = attempt;
        result
    }

    /// Fetch a single resource that does not use the bearer credential.
    ///
    /// # Errors
    /// The error of the [`NextAction::GiveUp`] that ended the request. An
    /// auth-expired outcome cannot be recovered here and gives up.
    pub async fn fetch_resource<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchOutcome<T>>,
    {
        let mut attempt = 0;
        self.drive(operation, None, &mut attempt, None, call).await
    }

    async fn drive<T, F, Fut>(
        &self,
        operation: &'static str,
        chunk: Option<usize>,
        attempt: &mut u32,
        refresher: Option<&TokenRefresher>,
        mut call: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchOutcome<T>>,
    {
        let mut retries_so_far = 0u32;
        let mut state = DriveState::Attempting;

        loop {
            state = match state {
                DriveState::Attempting => {
                    *attempt += 1;
                    let outcome = call().await;
                    debug!(
                        operation,
                        chunk = ?chunk,
                        attempt = *attempt,
                        outcome = outcome.label(),
                        "request finished"
                    );
                    match self.policy.next_action(outcome, retries_so_far) {
                        NextAction::Accept(payload) => DriveState::Accepted(payload),
                        NextAction::Retry(delay) => {
                            retries_so_far += 1;
                            DriveState::Waiting(delay)
                        }
                        NextAction::RefreshAndRetry => {
                            retries_so_far += 1;
                            DriveState::RefreshingCredential
                        }
                        NextAction::GiveUp(err) => DriveState::GivenUp(err),
                    }
                }
                DriveState::Waiting(delay) => {
                    warn!(
                        operation,
                        chunk = ?chunk,
                        attempt = *attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying after delay"
                    );
                    self.clock.sleep(delay).await;
                    DriveState::Attempting
                }
                DriveState::RefreshingCredential => match refresher {
                    Some(refresher) => {
                        warn!(operation, chunk = ?chunk, "credential rejected, refreshing");
                        match refresher.refresh().await {
                            Ok(_) => DriveState::Attempting,
                            Err(err) => DriveState::GivenUp(match err {
                                DunkstatsError::Auth(_) => err,
                                other => DunkstatsError::Auth(other.to_string()),
                            }),
                        }
                    }
                    None => DriveState::GivenUp(DunkstatsError::Auth(format!(
                        "{operation} rejected its credentials"
                    ))),
                },
                DriveState::Accepted(payload) => return Ok(payload),
                DriveState::GivenUp(err) => {
                    warn!(
                        operation,
                        chunk = ?chunk,
                        attempts = *attempt,
                        error = %err,
                        "giving up"
                    );
                    return Err(err);
                }
            };
        }
    }
}
