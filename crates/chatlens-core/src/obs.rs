//! Structured tracing events for archive inspection.
//!
//! Lifecycle events are emitted at `info!`, per-record events at `debug!`.
//! Verbosity follows `RUST_LOG` (see [`crate::init_tracing`]).

use tracing::{debug, info};

use crate::domain::{BlobId, BlobKind, ChronoEntry, Provenance};

/// RAII guard that enters an archive-scoped span while it is alive.
///
/// ```ignore
/// let _span = ArchiveSpan::enter("/home/me/.cursor/chats/abc/store.db");
/// // events emitted here carry `archive = ...`
/// ```
pub struct ArchiveSpan {
    _span: tracing::span::EnteredSpan,
}

impl ArchiveSpan {
    pub fn enter(location: &str) -> Self {
        let span = tracing::info_span!("chatlens.archive", archive = %location);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: archive opened for reading.
pub fn emit_archive_opened(location: &str, blob_count: usize) {
    info!(event = "archive.opened", archive = %location, blob_count = blob_count);
}

/// Emit event: archive could not be opened or read (warning level).
pub fn emit_archive_failed(location: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "archive.failed", archive = %location, error = %error);
}

/// Emit event: chronological index built.
pub fn emit_archive_indexed(entries: &[ChronoEntry]) {
    let from_envelope = entries
        .iter()
        .filter(|e| e.provenance == Provenance::Envelope)
        .count();
    info!(
        event = "archive.indexed",
        total = entries.len(),
        from_envelope = from_envelope,
        fallback = entries.len() - from_envelope,
    );
}

/// Emit event: envelope present but undecodable; mtime will be used.
pub fn emit_envelope_fallback(location: &str, error: &dyn std::fmt::Display) {
    debug!(event = "envelope.fallback", archive = %location, error = %error);
}

/// Emit event: one blob classified.
pub fn emit_blob_classified(blob_id: &BlobId, kind: BlobKind, len: usize) {
    debug!(event = "blob.classified", blob_id = %blob_id.short(), kind = %kind, len = len);
}
