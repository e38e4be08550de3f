//! Profile-picture mapping artifact

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mapping from Dunkbin user id to profile-picture metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfpMapping {
    pub metadata: MappingMetadata,
    pub users: BTreeMap<String, UserPfpEntry>,
}

/// Summary written at the top of the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingMetadata {
    pub generated: DateTime<Utc>,
    pub total_users: usize,
    pub users_with_pfp: usize,
    pub users_without_pfp: usize,
    pub unresolved_logins: usize,
    pub generator: String,
    pub description: String,
}

/// Per-user entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPfpEntry {
    pub username: String,
    pub display_name: String,
    pub pfp_filename: String,
    pub has_custom_pfp: bool,
    pub twitch_profile_url: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub reason: Option<String>,
}
