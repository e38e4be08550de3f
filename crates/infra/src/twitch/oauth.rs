//! Twitch OAuth token client
//!
//! Exchanges a refresh token (or the app's client credentials) for a new
//! bearer token with a form-encoded `POST` to the token endpoint.

use async_trait::async_trait;
use dunkstats_core::TokenEndpoint;
use dunkstats_domain::{DunkstatsError, Result, TokenGrant, TokenResponse};
use reqwest::Method;
use tracing::debug;

use crate::http::HttpClient;

/// [`TokenEndpoint`] for `id.twitch.tv/oauth2/token`.
#[derive(Clone)]
pub struct TwitchTokenClient {
    http: HttpClient,
    token_url: String,
    client_id: String,
    client_secret: Option<String>,
}

impl std::fmt::Debug for TwitchTokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchTokenClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl TwitchTokenClient {
    /// Client for the OAuth token endpoint; `client_secret` enables `client_credentials`.
    pub fn new(
        http: HttpClient,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.filter(|secret| !secret.is_empty()),
        }
    }

    /// Whether the client-credentials grant can be used.
    pub fn has_client_secret(&self) -> bool {
        self.client_secret.is_some()
    }

    fn form<'a>(&'a self, grant: &'a TokenGrant) -> Result<Vec<(&'static str, &'a str)>> {
        let mut form = vec![("client_id", self.client_id.as_str()), ("grant_type", grant.grant_type())];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.as_str()));
        }
        match grant {
            TokenGrant::RefreshToken(refresh_token) => form.push(("refresh_token", refresh_token.as_str())),
            TokenGrant::ClientCredentials if self.client_secret.is_none() => {
                return Err(DunkstatsError::Auth(
                    "client_credentials grant requires a client secret".into(),
                ));
            }
            TokenGrant::ClientCredentials => {}
        }
        Ok(form)
    }
}

#[async_trait]
impl TokenEndpoint for TwitchTokenClient {
    async fn exchange(&self, grant: &TokenGrant) -> Result<TokenResponse> {
        let form = self.form(grant)?;
        let request = self.http.request(Method::POST, &self.token_url).form(&form);

        debug!(grant_type = grant.grant_type(), "requesting token");
        let response = self
            .http
            .send(request)
            .await
            .map_err(|err| DunkstatsError::Auth(format!("token request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DunkstatsError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| DunkstatsError::Auth(format!("invalid token response: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer, secret: Option<&str>) -> TwitchTokenClient {
        TwitchTokenClient::new(
            HttpClient::new().unwrap(),
            format!("{}/oauth2/token", server.uri()),
            "client-123",
            secret.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn refresh_grant_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=r0"))
            .and(body_string_contains("client_id=client-123"))
            .and(body_string_contains("client_secret=s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a1",
                "refresh_token": "r1",
                "expires_in": 14_400,
                "scope": [],
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server, Some("s3cret"))
            .exchange(&TokenGrant::RefreshToken("r0".into()))
            .await
            .unwrap();

        assert_eq!(response.access_token, "a1");
        assert_eq!(response.refresh_token.as_deref(), Some("r1"));
        assert_eq!(response.expires_in, Some(14_400));
    }

    #[tokio::test]
    async fn client_credentials_response_without_refresh_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "app-token",
                "expires_in": 5_000_000,
                "token_type": "bearer"
            })))
            .mount(&server)
            .await;

        let response =
            client(&server, Some("s3cret")).exchange(&TokenGrant::ClientCredentials).await.unwrap();

        assert_eq!(response.access_token, "app-token");
        assert_eq!(response.refresh_token, None);
    }

    #[tokio::test]
    async fn rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"message":"Invalid refresh token"}"#),
            )
            .mount(&server)
            .await;

        let err = client(&server, None)
            .exchange(&TokenGrant::RefreshToken("bad".into()))
            .await
            .unwrap_err();

        match err {
            DunkstatsError::Auth(message) => {
                assert!(message.contains("400"));
                assert!(message.contains("Invalid refresh token"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn client_credentials_without_secret_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None).exchange(&TokenGrant::ClientCredentials).await.unwrap_err();

        assert!(matches!(err, DunkstatsError::Auth(_)));
    }
}
