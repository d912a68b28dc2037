//! In-memory fakes for storage traits (testing only)
//!
//! `MemoryArchiveStore` content-addresses blobs by SHA-256 the way the real
//! blob table does; `MemoryArchiveCatalog` serves a fixed list of files.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use chatlens_core::{Blob, BlobId, ENVELOPE_KEY};

use crate::storage_traits::*;

// ---------------------------------------------------------------------------
// MemoryArchiveStore
// ---------------------------------------------------------------------------

/// In-memory archive backed by ordered maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryArchiveStore {
    meta: BTreeMap<String, String>,
    blobs: BTreeMap<BlobId, Vec<u8>>,
}

impl MemoryArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under its SHA-256 hex digest and return that id.
    pub fn put_blob(&mut self, data: &[u8]) -> BlobId {
        let id = BlobId(hex::encode(Sha256::digest(data)));
        self.blobs.insert(id.clone(), data.to_vec());
        id
    }

    /// Store `data` under an explicit id.
    pub fn insert_blob(&mut self, id: impl Into<BlobId>, data: &[u8]) {
        self.blobs.insert(id.into(), data.to_vec());
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.meta.insert(key.into(), value.into());
    }

    /// Store `json` hex-encoded under the envelope key.
    pub fn set_envelope_json(&mut self, json: &str) {
        self.set_metadata(ENVELOPE_KEY, hex::encode(json.as_bytes()));
    }
}

impl ArchiveStore for MemoryArchiveStore {
    fn metadata_value(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.meta.get(key).cloned())
    }

    fn metadata_entries(&self) -> StoreResult<Vec<MetaEntry>> {
        Ok(self
            .meta
            .iter()
            .map(|(key, value)| MetaEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn list_blobs(&self) -> StoreResult<Vec<Blob>> {
        Ok(self
            .blobs
            .iter()
            .map(|(id, data)| Blob::new(id.clone(), data.clone()))
            .collect())
    }

    fn get_blob(&self, id: &BlobId) -> StoreResult<Option<Blob>> {
        Ok(self
            .blobs
            .get(id)
            .map(|data| Blob::new(id.clone(), data.clone())))
    }
}

// ---------------------------------------------------------------------------
// MemoryArchiveCatalog
// ---------------------------------------------------------------------------

/// Catalog returning a fixed set of files.
#[derive(Debug, Default, Clone)]
pub struct MemoryArchiveCatalog {
    files: Vec<ArchiveFile>,
}

impl MemoryArchiveCatalog {
    pub fn new(files: Vec<ArchiveFile>) -> Self {
        Self { files }
    }
}

impl ArchiveCatalog for MemoryArchiveCatalog {
    fn list_archive_locations(&self) -> StoreResult<Vec<ArchiveFile>> {
        Ok(self.files.clone())
    }
}
