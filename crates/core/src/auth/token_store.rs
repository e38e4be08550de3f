//! Token store
//!
//! Holds the one credential shared by every request and serializes refreshes
//! so concurrent callers share a single token exchange.

use std::future::Future;

use dunkstats_common::SingleFlight;
use dunkstats_domain::{Credential, DunkstatsError};
use parking_lot::RwLock;

/// Current credential plus the single-flight guard for its refresh.
#[derive(Debug, Default)]
pub struct TokenStore {
    current: RwLock<Option<Credential>>,
    refresh: SingleFlight<Credential, DunkstatsError>,
}

impl TokenStore {
    /// Create a store holding `initial`, if any.
    pub fn new(initial: Option<Credential>) -> Self {
        Self { current: RwLock::new(initial), refresh: SingleFlight::new() }
    }

    /// Snapshot of the current credential.
    pub fn current(&self) -> Option<Credential> {
        self.current.read().clone()
    }

    /// Replace the credential as a whole.
    pub fn replace(&self, credential: Credential) {
        *self.current.write() = Some(credential);
    }

    /// Whether a refresh is currently pending.
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh.in_flight()
    }

    /// Number of refreshes that actually started (joined callers excluded).
    pub fn refreshes_started(&self) -> u64 {
        self.refresh.flights_started()
    }

    /// Run `start` as the refresh operation, or join the pending one.
    ///
    /// All callers observe the same result.
    ///
    /// # Errors
    /// Whatever error the shared refresh produced.
    pub async fn refresh_with<F, Fut>(&self, start: F) -> Result<Credential, DunkstatsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Credential, DunkstatsError>> + Send + 'static,
    {
        self.refresh.run(start).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_whole_credential() {
        let store = TokenStore::new(Some(Credential::new("old", Some("r1".into()))));
        store.replace(Credential::new("new", None));

        let current = store.current().unwrap();
        assert_eq!(current.access_token, "new");
        assert_eq!(current.refresh_token, None);
    }

    #[test]
    fn empty_store_has_no_credential() {
        let store = TokenStore::default();
        assert!(store.current().is_none());
        assert!(!store.refresh_in_flight());
    }

    #[tokio::test]
    async fn refresh_with_returns_shared_result() {
        let store = TokenStore::default();
        let credential = store
            .refresh_with(|| async { Ok(Credential::new("fresh", None)) })
            .await
            .unwrap();

        assert_eq!(credential.access_token, "fresh");
        assert_eq!(store.refreshes_started(), 1);
        assert!(!store.refresh_in_flight());
    }
}
