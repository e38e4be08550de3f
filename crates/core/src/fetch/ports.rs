//! Port interfaces for remote lookups
//!
//! Adapters perform exactly one HTTP call per invocation and classify the
//! response; retrying is the caller's job.

use async_trait::async_trait;
use dunkstats_domain::{Credential, DunkbinUser, FetchOutcome, TwitchUser};

/// Bulk user lookup by login (Twitch Helix `GET /users`).
#[async_trait]
pub trait UserLookup: Send + Sync {
    /// Look up one chunk of logins with the given bearer credential.
    async fn lookup_users(
        &self,
        logins: &[String],
        credential: &Credential,
    ) -> FetchOutcome<Vec<TwitchUser>>;
}

/// Source of the logins to resolve (Dunkbin users export).
#[async_trait]
pub trait SourceDirectory: Send + Sync {
    /// Fetch the full user list.
    async fn fetch_users(&self) -> FetchOutcome<Vec<DunkbinUser>>;
}
