//! Storage trait definitions for chatlens
//!
//! - `ArchiveStore`: one archive's `meta` key/value table and `blobs` table
//! - `ArchiveCatalog`: where the archives are and when they were last modified
//!
//! Both are read-only and synchronous. In-memory fakes live in `fakes`.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chatlens_core::{Blob, BlobId, ENVELOPE_KEY};

use crate::error::StoreError;

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One row of the `meta` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

/// Read access to a single archive.
pub trait ArchiveStore {
    /// Value stored under `key` in the `meta` table.
    fn metadata_value(&self, key: &str) -> StoreResult<Option<String>>;

    /// Every `meta` row, in storage order.
    fn metadata_entries(&self) -> StoreResult<Vec<MetaEntry>>;

    /// Every blob, in storage order.
    fn list_blobs(&self) -> StoreResult<Vec<Blob>>;

    /// A single blob by id.
    fn get_blob(&self, id: &BlobId) -> StoreResult<Option<Blob>>;

    /// Raw hex envelope (the `meta` row under [`ENVELOPE_KEY`]).
    fn envelope_hex(&self) -> StoreResult<Option<String>> {
        self.metadata_value(ENVELOPE_KEY)
    }
}

/// A discovered archive file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArchiveFile {
    pub path: PathBuf,
    /// Modification time, epoch seconds (0 when unavailable).
    pub modified_secs: i64,
}

impl ArchiveFile {
    pub fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Modification time of `metadata` in epoch seconds, or 0 when the
/// platform cannot report it.
pub fn modified_secs(metadata: &std::fs::Metadata) -> i64 {
    metadata.modified().map(epoch_secs).unwrap_or(0)
}

/// Whole epoch seconds, floored. Times before the epoch are negative.
fn epoch_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(err) => {
            let before = err.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

/// Source of archive locations.
pub trait ArchiveCatalog {
    fn list_archive_locations(&self) -> StoreResult<Vec<ArchiveFile>>;
}
