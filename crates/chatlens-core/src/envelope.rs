//! Metadata envelope decoding.
//!
//! The `meta` table stores the archive's descriptor under key `"0"` as
//! hex-encoded UTF-8 JSON. Decoding is strict: any layer that fails
//! (hex, UTF-8, JSON, object shape) is reported as a [`DecodeError`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::BlobId;
use crate::error::{DecodeError, Result};

/// Key of the `meta` row that holds the envelope.
pub const ENVELOPE_KEY: &str = "0";

/// Decoded archive descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_root_blob_id: Option<BlobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_model: Option<String>,
    /// Fields this crate does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// `createdAt` floored to whole epoch seconds.
    pub fn created_at_secs(&self) -> Option<i64> {
        self.created_at.map(|ms| ms.div_euclid(1000))
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.and_then(DateTime::from_timestamp_millis)
    }
}

/// `null` reads as the field's default, the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a hex-encoded JSON envelope.
///
/// Surrounding whitespace is ignored; everything else must be valid hex of a
/// UTF-8 JSON object. Known fields with the wrong JSON type are rejected.
pub fn decode_envelope(hex_value: &str) -> Result<Envelope> {
    let bytes = hex::decode(hex_value.trim())?;
    let text = std::str::from_utf8(&bytes)?;
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value)?),
        other => Err(DecodeError::NotObject {
            found: json_type_name(&other),
        }),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexify(s: &str) -> String {
        hex::encode(s.as_bytes())
    }

    #[test]
    fn test_decode_minimal_envelope() {
        let env = decode_envelope(&hexify(r#"{"agentId":"a1"}"#)).expect("decode");
        assert_eq!(env.agent_id, "a1");
        assert_eq!(env.created_at, None);
        assert_eq!(env.latest_root_blob_id, None);
        assert!(env.extra.is_empty());
    }

    #[test]
    fn test_decode_full_envelope_keeps_unknown_fields() {
        let json = r#"{"agentId":"agent-7","latestRootBlobId":"ab12","name":"Refactor parser",
            "createdAt":1700000000123,"mode":"agent","lastUsedModel":"m-large","pinned":true}"#;
        let env = decode_envelope(&hexify(json)).expect("decode");
        assert_eq!(env.latest_root_blob_id, Some(BlobId::from("ab12")));
        assert_eq!(env.name.as_deref(), Some("Refactor parser"));
        assert_eq!(env.created_at, Some(1_700_000_000_123));
        assert_eq!(env.created_at_secs(), Some(1_700_000_000));
        assert_eq!(env.mode.as_deref(), Some("agent"));
        assert_eq!(env.last_used_model.as_deref(), Some("m-large"));
        assert_eq!(env.extra.get("pinned"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_decode_accepts_uppercase_hex_and_whitespace() {
        let hex = hexify(r#"{"agentId":"x"}"#).to_uppercase();
        let env = decode_envelope(&format!("  {hex}\n")).expect("decode");
        assert_eq!(env.agent_id, "x");
    }

    #[test]
    fn test_decode_null_fields_read_as_absent() {
        let json = r#"{"agentId":null,"latestRootBlobId":null,"name":null,"createdAt":2000,
            "mode":null,"lastUsedModel":null}"#;
        let env = decode_envelope(&hexify(json)).expect("decode");
        assert_eq!(env.agent_id, "");
        assert_eq!(env.latest_root_blob_id, None);
        assert_eq!(env.name, None);
        assert_eq!(env.created_at_secs(), Some(2));
        assert!(env.extra.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        let err = decode_envelope("not hex at all").unwrap_err();
        assert!(matches!(err, DecodeError::Hex(_)));
    }

    #[test]
    fn test_decode_rejects_odd_length_hex() {
        assert!(matches!(
            decode_envelope("7b2").unwrap_err(),
            DecodeError::Hex(_)
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode_envelope("fffe").unwrap_err();
        assert!(matches!(err, DecodeError::Utf8(_)));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        let err = decode_envelope(&hexify(r#"{"agentId":"#)).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_envelope(&hexify("[1,2,3]")).unwrap_err();
        assert!(matches!(err, DecodeError::NotObject { found: "array" }));
    }

    #[test]
    fn test_decode_rejects_wrongly_typed_known_field() {
        let err = decode_envelope(&hexify(r#"{"createdAt":"yesterday"}"#)).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_created_at_secs_floors_negative() {
        let env = Envelope {
            created_at: Some(-1),
            ..Default::default()
        };
        assert_eq!(env.created_at_secs(), Some(-1));
    }

    #[test]
    fn test_created_at_utc() {
        let env = Envelope {
            created_at: Some(0),
            ..Default::default()
        };
        assert_eq!(
            env.created_at_utc().map(|t| t.to_rfc3339()),
            Some("1970-01-01T00:00:00+00:00".to_string())
        );
    }
}
