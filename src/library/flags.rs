//! Wire helpers for the backend's integer flags.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Accepts `true`/`false`, `1`/`0` and `"1"`/`"0"`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(i) => Ok(i != 0),
        Flag::Text(s) => match s.as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid flag '{}'", other))),
        },
    }
}

pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_bool(*value)
}

/// The `1`/`0` form payloads carry.
pub fn as_int(value: bool) -> u8 {
    u8::from(value)
}

/// Case-insensitive containment against an already lowercased needle.
pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn contains_opt(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map(|h| contains(h, needle)).unwrap_or(false)
}
