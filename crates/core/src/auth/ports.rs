//! Port interfaces for token exchange and persistence

use async_trait::async_trait;
use dunkstats_domain::{Credential, Result, TokenGrant, TokenResponse};

/// OAuth token endpoint.
#[async_trait]
pub trait TokenEndpoint: Send + Sync {
    /// Exchange `grant` for a new token response.
    ///
    /// # Errors
    /// `DunkstatsError::Auth` when the endpoint rejects the grant, with the
    /// status and response body in the message.
    async fn exchange(&self, grant: &TokenGrant) -> Result<TokenResponse>;
}

/// Receives every credential produced by a successful refresh.
#[async_trait]
pub trait CredentialSink: Send + Sync {
    /// Called once per successful refresh with the new credential.
    async fn on_credential_refreshed(&self, credential: &Credential) -> Result<()>;
}

/// Sink that discards refreshed credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCredentialSink;

#[async_trait]
impl CredentialSink for NoopCredentialSink {
    async fn on_credential_refreshed(&self, _credential: &Credential) -> Result<()> {
        Ok(())
    }
}
