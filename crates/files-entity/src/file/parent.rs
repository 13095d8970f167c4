//! Serde adapter for parent references.
//!
//! The wire format spells "no parent" as `0`. Use with
//! `#[serde(with = "files_entity::file::parent")]` on an `Option<FileId>`.

use files_core::types::FileId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize `None` as `0` and `Some(id)` as the id string.
pub fn serialize<S: Serializer>(parent: &Option<FileId>, serializer: S) -> Result<S::Ok, S::Error> {
    match parent {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_u8(0),
    }
}

/// Accept `0`, `"0"`, `null`, or an id string.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<FileId>, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) if n.as_u64() == Some(0) => Ok(None),
        Some(serde_json::Value::String(s)) if s == "0" => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid parent id '{s}'"))),
        Some(other) => Err(D::Error::custom(format!("invalid parent id {other}"))),
    }
}

/// Parse a query-string parent reference the same way.
pub fn parse(raw: &str) -> Option<Option<FileId>> {
    match raw {
        "" | "0" => Some(None),
        other => other.parse().ok().map(Some),
    }
}
