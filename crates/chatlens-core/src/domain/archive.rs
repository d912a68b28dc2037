//! Archive-level domain types used by the chronological index.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// Index input: one archive and the raw material for its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLocation {
    /// Where the archive lives (usually a filesystem path).
    pub location: String,
    /// Filesystem modification time, epoch seconds.
    pub modified_secs: i64,
    /// Raw hex value of the metadata envelope, if the archive had one.
    pub envelope_hex: Option<String>,
}

impl ArchiveLocation {
    pub fn new(location: impl Into<String>, modified_secs: i64) -> Self {
        Self {
            location: location.into(),
            modified_secs,
            envelope_hex: None,
        }
    }

    pub fn with_envelope_hex(mut self, hex: impl Into<String>) -> Self {
        self.envelope_hex = Some(hex.into());
        self
    }
}

/// Where a resolved timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Envelope,
    FilesystemFallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Envelope => f.write_str("envelope"),
            Provenance::FilesystemFallback => f.write_str("filesystem-fallback"),
        }
    }
}

/// One row of the chronological index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronoEntry {
    pub location: String,
    /// Resolved timestamp, epoch seconds.
    pub timestamp: i64,
    pub provenance: Provenance,
    /// Decoded envelope, when decoding succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envelope: Option<Envelope>,
}

impl ChronoEntry {
    /// Display name from the envelope, if any.
    pub fn name(&self) -> Option<&str> {
        self.envelope.as_ref().and_then(|e| e.name.as_deref())
    }
}
