//! Error taxonomy for chatlens-core.
//!
//! Only explicit envelope decoding can fail. Classification, extraction and
//! chronological indexing degrade to conservative defaults instead.

/// Errors produced while decoding a hex-encoded metadata envelope or a JSON blob.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON value is not an object (found {found})")]
    NotObject { found: &'static str },
}

/// Result type for envelope decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;
