//! Dunkbin users export client

use async_trait::async_trait;
use dunkstats_core::{ResponseClassifier, SourceDirectory};
use dunkstats_domain::{DunkbinUser, FetchOutcome};
use reqwest::Method;
use tracing::debug;

use crate::http::{classify_response, HttpClient};

/// [`SourceDirectory`] reading the Dunkbin users export with HTTP Basic
/// auth.
#[derive(Clone)]
pub struct DunkbinClient {
    http: HttpClient,
    users_url: String,
    username: String,
    password: String,
    classifier: ResponseClassifier,
}

impl std::fmt::Debug for DunkbinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DunkbinClient")
            .field("users_url", &self.users_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl DunkbinClient {
    /// Client for the users export behind HTTP Basic auth.
    pub fn new(
        http: HttpClient,
        users_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http,
            users_url: users_url.into(),
            username: username.into(),
            password: password.into(),
            // Basic auth cannot be refreshed; 401/403 are permanent.
            classifier: ResponseClassifier::without_auth_refresh(),
        }
    }
}

#[async_trait]
impl SourceDirectory for DunkbinClient {
    async fn fetch_users(&self) -> FetchOutcome<Vec<DunkbinUser>> {
        let request = self
            .http
            .request(Method::GET, &self.users_url)
            .basic_auth(&self.username, Some(&self.password));

        debug!(url = %self.users_url, "fetching Dunkbin users");
        classify_response(self.http.send(request).await, &self.classifier).await
    }
}
