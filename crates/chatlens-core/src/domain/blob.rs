//! Blob-level domain types.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a blob in an archive's content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(pub String);

impl BlobId {
    pub fn new(id: impl Into<String>) -> Self {
        BlobId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form (first 24 chars), enough to tell blobs apart in listings.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(24) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl std::fmt::Display for BlobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BlobId {
    fn from(s: &str) -> Self {
        BlobId(s.to_string())
    }
}

/// A raw record read from the blob table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub id: BlobId,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(id: impl Into<BlobId>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Classification tag of a blob. Assigned once, from the bytes alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlobKind {
    /// JSON object with truthy `role` and `content`.
    ConversationalJson,
    /// JSON object of any other shape.
    OtherJson,
    /// Everything else, including empty and malformed JSON-looking input.
    Binary,
}

impl BlobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobKind::ConversationalJson => "conversational-json",
            BlobKind::OtherJson => "other-json",
            BlobKind::Binary => "binary",
        }
    }
}

impl std::fmt::Display for BlobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag marker that introduced a recovered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTag {
    /// `0x0A`: field 1, length-delimited.
    Field1,
    /// `0x12`: field 2, length-delimited.
    Field2,
}

impl FieldTag {
    pub const FIELD1_MARKER: u8 = 0x0A;
    pub const FIELD2_MARKER: u8 = 0x12;

    pub fn from_marker(byte: u8) -> Option<Self> {
        match byte {
            Self::FIELD1_MARKER => Some(FieldTag::Field1),
            Self::FIELD2_MARKER => Some(FieldTag::Field2),
            _ => None,
        }
    }

    /// Minimum-content filter applied to a trimmed segment.
    ///
    /// Field-2 segments are noisier, so they need more than two characters.
    pub fn accepts(&self, trimmed: &str) -> bool {
        match self {
            FieldTag::Field1 => !trimmed.is_empty(),
            FieldTag::Field2 => trimmed.chars().count() > 2,
        }
    }
}

/// A text run recovered from a binary blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Originating blob, when the scan was started from a [`Blob`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blob_id: Option<BlobId>,
    /// Byte offset of the tag marker within the blob.
    pub offset: usize,
    pub tag: FieldTag,
    /// Recovered text, whitespace-trimmed.
    pub text: String,
}
