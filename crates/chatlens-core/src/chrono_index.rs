//! Chronological ordering of archives.
//!
//! The envelope's `createdAt` is preferred; archives without one (or whose
//! envelope does not decode) fall back to the file's modification time.

use crate::domain::{ArchiveLocation, ChronoEntry, Provenance};
use crate::envelope::{decode_envelope, Envelope};
use crate::obs;

/// Resolve the timestamp for a single archive. Never fails.
pub fn resolve_entry(location: ArchiveLocation) -> ChronoEntry {
    let envelope = location
        .envelope_hex
        .as_deref()
        .and_then(|hex| match decode_envelope(hex) {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                obs::emit_envelope_fallback(&location.location, &err);
                None
            }
        });

    let (timestamp, provenance) = match envelope.as_ref().and_then(Envelope::created_at_secs) {
        Some(secs) => (secs, Provenance::Envelope),
        None => (location.modified_secs, Provenance::FilesystemFallback),
    };

    ChronoEntry {
        location: location.location,
        timestamp,
        provenance,
        envelope,
    }
}

/// Build the full index, oldest first. Ties are broken by location.
pub fn build_chrono_index<I>(locations: I) -> Vec<ChronoEntry>
where
    I: IntoIterator<Item = ArchiveLocation>,
{
    let mut entries: Vec<ChronoEntry> = locations.into_iter().map(resolve_entry).collect();
    sort_chronologically(&mut entries);
    entries
}

/// Sort entries ascending by timestamp, then by location.
pub fn sort_chronologically(entries: &mut [ChronoEntry]) {
    entries.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.location.cmp(&b.location))
    });
}
