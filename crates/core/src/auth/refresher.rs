//! Token refresher
//!
//! Renews the bearer credential held by a [`TokenStore`]:
//! - `refresh_token` grant when a refresh token is known
//! - `client_credentials` grant as the fallback when a client secret is set
//! - at most one exchange in flight; concurrent callers share its result
//!
//! Every successful refresh is handed to the configured [`CredentialSink`].
//! A failing sink is logged and does not fail the refresh.

use std::sync::Arc;

use dunkstats_domain::{Credential, DunkstatsError, Result, TokenGrant};
use tracing::{debug, info, warn};

use super::ports::{CredentialSink, NoopCredentialSink, TokenEndpoint};
use super::token_store::TokenStore;

/// Refreshes the credential in a shared [`TokenStore`].
#[derive(Clone)]
pub struct TokenRefresher {
    store: Arc<TokenStore>,
    endpoint: Arc<dyn TokenEndpoint>,
    sink: Arc<dyn CredentialSink>,
    allow_client_credentials: bool,
    refresh_threshold_seconds: i64,
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("store", &self.store)
            .field("allow_client_credentials", &self.allow_client_credentials)
            .field("refresh_threshold_seconds", &self.refresh_threshold_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenRefresher {
    /// Create a refresher with a no-op sink and the default 5 minute
    /// expiry threshold.
    pub fn new(store: Arc<TokenStore>, endpoint: Arc<dyn TokenEndpoint>) -> Self {
        Self {
            store,
            endpoint,
            sink: Arc::new(NoopCredentialSink),
            allow_client_credentials: false,
            refresh_threshold_seconds: dunkstats_domain::constants::DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }

    /// Persist refreshed credentials through `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn CredentialSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Fall back to the client-credentials grant when no refresh token is
    /// known. Only meaningful when the endpoint holds a client secret.
    #[must_use]
    pub fn with_client_credentials(mut self, allow: bool) -> Self {
        self.allow_client_credentials = allow;
        self
    }

    /// Refresh ahead of expiry when the credential expires within
    /// `seconds`.
    #[must_use]
    pub fn with_refresh_threshold(mut self, seconds: i64) -> Self {
        self.refresh_threshold_seconds = seconds;
        self
    }

    /// Store this refresher writes to.
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Return a usable credential, refreshing first when the store is
    /// empty, holds no access token, or the token is about to expire.
    ///
    /// # Errors
    /// `DunkstatsError::Auth` when a refresh is needed and fails.
    pub async fn ensure_credential(&self) -> Result<Credential> {
        match self.store.current() {
            Some(credential)
                if !credential.access_token.is_empty()
                    && !credential.is_expired(self.refresh_threshold_seconds) =>
            {
                Ok(credential)
            }
            Some(credential) => {
                debug!(
                    expires_in = ?credential.seconds_until_expiry(),
                    has_access_token = !credential.access_token.is_empty(),
                    "credential needs refresh before use"
                );
                self.refresh().await
            }
            None => self.refresh().await,
        }
    }

    /// Obtain a new credential and install it in the store.
    ///
    /// Joins the pending refresh when one is already running.
    ///
    /// # Errors
    /// `DunkstatsError::Auth` when no grant is possible or the endpoint
    /// rejects the grant. The store is left untouched in that case.
    pub async fn refresh(&self) -> Result<Credential> {
        let store = Arc::clone(&self.store);
        let endpoint = Arc::clone(&self.endpoint);
        let sink = Arc::clone(&self.sink);
        let allow_client_credentials = self.allow_client_credentials;

        self.store
            .refresh_with(move || async move {
                let previous = store.current();
                let grant = select_grant(previous.as_ref(), allow_client_credentials)?;
                info!(grant_type = grant.grant_type(), "refreshing access token");

                let response = endpoint.exchange(&grant).await.map_err(|err| {
                    warn!(grant_type = grant.grant_type(), error = %err, "token refresh failed");
                    err
                })?;

                let credential = match previous.as_ref() {
                    Some(previous) => previous.succeeded_by(response),
                    None => Credential::from(response),
                };
                store.replace(credential.clone());
                info!(
                    expires_in = ?credential.seconds_until_expiry(),
                    "access token refreshed"
                );

                if let Err(err) = sink.on_credential_refreshed(&credential).await {
                    warn!(error = %err, "failed to persist refreshed credential");
                }

                Ok::<_, DunkstatsError>(credential)
            })
            .await
    }
}

fn select_grant(current: Option<&Credential>, allow_client_credentials: bool) -> Result<TokenGrant> {
    let refresh_token = current
        .and_then(|credential| credential.refresh_token.as_deref())
        .filter(|token| !token.is_empty());

    match refresh_token {
        Some(token) => Ok(TokenGrant::RefreshToken(token.to_string())),
        None if allow_client_credentials => Ok(TokenGrant::ClientCredentials),
        None => Err(DunkstatsError::Auth(
            "no refresh token or client secret available to obtain an access token".into(),
        )),
    }
}
