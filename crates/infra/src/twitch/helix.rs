//! Helix users client
//!
//! One `GET /helix/users?login=a&login=b...` per call, authorized with the
//! app's `Client-Id` and the current bearer token.

use async_trait::async_trait;
use dunkstats_core::{ResponseClassifier, UserLookup};
use dunkstats_domain::{Credential, FetchOutcome, HelixUsersResponse, TwitchUser};
use reqwest::Method;
use tracing::debug;

use crate::http::{classify_response, HttpClient};

/// [`UserLookup`] backed by the Helix API.
#[derive(Debug, Clone)]
pub struct HelixUserClient {
    http: HttpClient,
    users_url: String,
    client_id: String,
    classifier: ResponseClassifier,
}

impl HelixUserClient {
    /// Client for the Helix users endpoint.
    pub fn new(
        http: HttpClient,
        users_url: impl Into<String>,
        client_id: impl Into<String>,
        classifier: ResponseClassifier,
    ) -> Self {
        Self { http, users_url: users_url.into(), client_id: client_id.into(), classifier }
    }
}

#[async_trait]
impl UserLookup for HelixUserClient {
    async fn lookup_users(
        &self,
        logins: &[String],
        credential: &Credential,
    ) -> FetchOutcome<Vec<TwitchUser>> {
        let query: Vec<(&str, &str)> = logins.iter().map(|login| ("login", login.as_str())).collect();
        let request = self
            .http
            .request(Method::GET, &self.users_url)
            .query(&query)
            .header("Client-Id", &self.client_id)
            .bearer_auth(&credential.access_token);

        debug!(logins = logins.len(), "looking up Twitch users");
        classify_response::<HelixUsersResponse>(self.http.send(request).await, &self.classifier)
            .await
            .map(|body| body.data)
    }
}
