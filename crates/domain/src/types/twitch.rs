//! Twitch Helix user records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user entry returned by `GET /helix/users`.
///
/// Only the identifying login and the profile image are interpreted; every
/// other field is preserved untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitchUser {
    #[serde(default)]
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TwitchUser {
    /// Identifying key used to match records back to requested logins.
    pub fn key(&self) -> String {
        self.login.to_lowercase()
    }

    /// Profile image URL, ignoring empty strings.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Envelope of the Helix bulk lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixUsersResponse {
    #[serde(default)]
    pub data: Vec<TwitchUser>,
}
