//! Glue from discovered archive files to chronological index input.

use chatlens_core::ArchiveLocation;
use tracing::debug;

use crate::sqlite::SqliteArchiveStore;
use crate::storage_traits::{ArchiveFile, ArchiveStore};

/// Read the envelope of `archive` through `store`. Read failures leave the
/// envelope absent, so the index falls back to the file's mtime.
pub fn archive_location<S: ArchiveStore>(archive: &ArchiveFile, store: &S) -> ArchiveLocation {
    let location = ArchiveLocation::new(archive.location(), archive.modified_secs);
    match store.envelope_hex() {
        Ok(Some(hex)) => location.with_envelope_hex(hex),
        Ok(None) => location,
        Err(err) => {
            debug!(archive = %archive.location(), error = %err, "envelope unreadable");
            location
        }
    }
}

/// Open `archive` from disk and read its envelope. Never fails.
pub fn resolve_archive_location(archive: &ArchiveFile) -> ArchiveLocation {
    match SqliteArchiveStore::open_read_only(&archive.path) {
        Ok(store) => archive_location(archive, &store),
        Err(err) => {
            debug!(archive = %archive.location(), error = %err, "archive unopenable");
            ArchiveLocation::new(archive.location(), archive.modified_secs)
        }
    }
}
