//! Dunkbin export records

use serde::{Deserialize, Serialize};

use crate::utils::serde::string_or_number;

/// A user row from the Dunkbin users export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DunkbinUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl DunkbinUser {
    /// Login, ignoring empty strings.
    pub fn login(&self) -> Option<&str> {
        self.login.as_deref().filter(|login| !login.is_empty())
    }
}
