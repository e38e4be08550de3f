//! OAuth credential types
//!
//! A [`Credential`] is the bearer token presented to the Twitch API together
//! with the longer-lived refresh token used to renew it.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer credential held by the token store.
///
/// Replaced as a whole whenever a refresh succeeds; never mutated in place.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential without expiry information.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token, expires_at: None }
    }

    /// Attach an absolute expiry timestamp.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the credential is expired or expires within `threshold_seconds`.
    ///
    /// A credential without expiry information is never considered expired;
    /// the API tells us with a 401 instead. A threshold too large to
    /// represent counts as expired.
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        let Some(expires_at) = self.expires_at else {
            return false;
        };
        Duration::try_seconds(threshold_seconds)
            .and_then(|threshold| Utc::now().checked_add_signed(threshold))
            .map_or(true, |deadline| deadline >= expires_at)
    }

    /// Seconds until the access token expires, if known.
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }

    /// Build the credential that replaces `self` after a token exchange.
    ///
    /// Token endpoints may omit `refresh_token` on refresh; the previous one
    /// stays valid in that case.
    pub fn succeeded_by(&self, response: TokenResponse) -> Self {
        let mut next = Self::from(response);
        if next.refresh_token.is_none() {
            next.refresh_token.clone_from(&self.refresh_token);
        }
        next
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token response from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl From<TokenResponse> for Credential {
    fn from(response: TokenResponse) -> Self {
        let expires_at = response
            .expires_in
            .filter(|seconds| *seconds > 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        Self { access_token: response.access_token, refresh_token: response.refresh_token, expires_at }
    }
}

/// Grant requested from the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// `grant_type=refresh_token`
    RefreshToken(String),
    /// `grant_type=client_credentials`
    ClientCredentials,
}

impl TokenGrant {
    /// Value of the `grant_type` form field.
    pub fn grant_type(&self) -> &'static str {
        match self {
            Self::RefreshToken(_) => "refresh_token",
            Self::ClientCredentials => "client_credentials",
        }
    }
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.grant_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(refresh: Option<&str>, expires_in: Option<i64>) -> TokenResponse {
        TokenResponse {
            access_token: "new-access".into(),
            refresh_token: refresh.map(str::to_string),
            expires_in,
            token_type: Some("bearer".into()),
        }
    }

    #[test]
    fn credential_without_expiry_is_never_expired() {
        let credential = Credential::new("abc", None);
        assert!(!credential.is_expired(300));
        assert_eq!(credential.seconds_until_expiry(), None);
    }

    #[test]
    fn credential_inside_threshold_is_expired() {
        let credential = Credential::new("abc", None).with_expiry(Utc::now() + Duration::seconds(60));
        assert!(credential.is_expired(300));
        assert!(!credential.is_expired(0));
    }

    #[test]
    fn oversized_threshold_counts_as_expired() {
        let credential = Credential::new("abc", None).with_expiry(Utc::now() + Duration::days(30));
        assert!(credential.is_expired(i64::MAX));
    }

    #[test]
    fn unrepresentable_lifetime_drops_expiry() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token":"a","expires_in":9223372036854775807}"#).unwrap();
        let credential = Credential::from(response);
        assert_eq!(credential.access_token, "a");
        assert_eq!(credential.expires_at, None);
    }

    #[test]
    fn succeeded_by_keeps_previous_refresh_token() {
        let current = Credential::new("old", Some("refresh-1".into()));
        let next = current.succeeded_by(response(None, Some(3600)));
        assert_eq!(next.access_token, "new-access");
        assert_eq!(next.refresh_token.as_deref(), Some("refresh-1"));
        assert!(next.expires_at.is_some());
    }

    #[test]
    fn succeeded_by_prefers_rotated_refresh_token() {
        let current = Credential::new("old", Some("refresh-1".into()));
        let next = current.succeeded_by(response(Some("refresh-2"), None));
        assert_eq!(next.refresh_token.as_deref(), Some("refresh-2"));
        assert_eq!(next.expires_at, None);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let credential = Credential::new("super-secret", Some("also-secret".into()));
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("also-secret"));
    }
}
