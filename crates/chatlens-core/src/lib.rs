//! chatlens-core: read-only interpretation of chat-archive stores
//!
//! An archive is a key/value `meta` table plus a content-addressed `blobs`
//! table. Blobs are either UTF-8 JSON records or an undocumented
//! protobuf-like binary encoding. This crate holds the pure logic:
//!
//! - [`decode_envelope`]: hex → UTF-8 → JSON metadata envelope
//! - [`classify`]: conversational JSON, other JSON, or binary
//! - [`extract_text`]: best-effort text recovery from binary blobs
//! - [`build_chrono_index`]: archive ordering by `createdAt`, mtime fallback
//!
//! Everything here is synchronous and side-effect free; storage access lives
//! in `chatlens-store`.

pub mod chrono_index;
pub mod classify;
pub mod domain;
pub mod envelope;
mod error;
pub mod extract;
pub mod obs;
pub mod telemetry;

pub use chrono_index::{build_chrono_index, resolve_entry, sort_chronologically};
pub use classify::{classify, classify_blob, content_text, is_truthy, ChatMessage, ClassifiedBlob};
pub use domain::{
    ArchiveLocation, Blob, BlobId, BlobKind, ChronoEntry, FieldTag, Provenance, TextFragment,
};
pub use envelope::{decode_envelope, Envelope, ENVELOPE_KEY};
pub use error::{DecodeError, Result};
pub use extract::{extract_blob_text, extract_text, ScanStep, TextFragments};
pub use obs::{
    emit_archive_failed, emit_archive_indexed, emit_archive_opened, emit_blob_classified,
    emit_envelope_fallback, ArchiveSpan,
};
pub use telemetry::init_tracing;
