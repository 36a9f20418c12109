//! Serde helpers for patch fields that can be cleared.
//!
//! Use with `#[serde(default, with = "nullable", skip_serializing_if = "Option::is_none")]`
//! on an `Option<Option<T>>`: an absent key stays `None` and is left untouched,
//! an explicit `null` becomes `Some(None)` and is written through as `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
