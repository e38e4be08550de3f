//! Serialization helpers for upstream payloads
//!
//! Upstream exports are not consistent about identifier types; these helpers
//! normalise them while deserializing.

use serde::{Deserialize, Deserializer};

/// Deserialize a JSON string or number into a `String`.
///
/// # Usage
/// ```rust
/// use dunkstats_domain::utils::serde::string_or_number;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(deserialize_with = "string_or_number")]
///     id: String,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"id": 42}"#).unwrap();
/// assert_eq!(row.id, "42");
/// ```
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(value) => value,
        Raw::Int(value) => value.to_string(),
        Raw::Uint(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}
