//! Blob classification.
//!
//! A blob is JSON only when it begins with `{"` and parses as a JSON object;
//! anything else, including JSON-looking text that fails to parse, is binary.
//! Classification never fails.

use serde_json::{Map, Value};

use crate::domain::BlobKind;
use crate::error::{DecodeError, Result};
use crate::envelope::json_type_name;

const JSON_OBJECT_PREFIX: &[u8] = b"{\"";

/// Classification result carrying the parsed object for JSON blobs.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedBlob {
    Conversational(ChatMessage),
    OtherJson(Map<String, Value>),
    Binary,
}

impl ClassifiedBlob {
    pub fn kind(&self) -> BlobKind {
        match self {
            ClassifiedBlob::Conversational(_) => BlobKind::ConversationalJson,
            ClassifiedBlob::OtherJson(_) => BlobKind::OtherJson,
            ClassifiedBlob::Binary => BlobKind::Binary,
        }
    }
}

/// A JSON blob with truthy `role` and `content`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub object: Map<String, Value>,
}

impl ChatMessage {
    /// The role as display text. Non-string roles render as compact JSON.
    pub fn role(&self) -> String {
        match self.object.get("role") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn content(&self) -> &Value {
        self.object.get("content").unwrap_or(&Value::Null)
    }

    /// Display text of `content`: a plain string, or the `text` of every
    /// part in an array of parts, joined by newlines.
    pub fn content_text(&self) -> String {
        content_text(self.content())
    }
}

/// Classify raw bytes into one of the three [`BlobKind`]s.
pub fn classify(data: &[u8]) -> BlobKind {
    classify_blob(data).kind()
}

/// Classify raw bytes, keeping the parsed JSON object when there is one.
pub fn classify_blob(data: &[u8]) -> ClassifiedBlob {
    if !data.starts_with(JSON_OBJECT_PREFIX) {
        return ClassifiedBlob::Binary;
    }
    match parse_json_object(data) {
        Ok(object) => {
            let conversational = object.get("role").is_some_and(is_truthy)
                && object.get("content").is_some_and(is_truthy);
            if conversational {
                ClassifiedBlob::Conversational(ChatMessage { object })
            } else {
                ClassifiedBlob::OtherJson(object)
            }
        }
        Err(err) => {
            tracing::trace!(error = %err, "JSON-looking blob failed to parse, treating as binary");
            ClassifiedBlob::Binary
        }
    }
}

fn parse_json_object(data: &[u8]) -> Result<Map<String, Value>> {
    let text = std::str::from_utf8(data)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotObject {
            found: json_type_name(&other),
        }),
    }
}

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Display text of a message `content` value.
pub fn content_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
