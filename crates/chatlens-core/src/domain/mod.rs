//! Domain models for chatlens.
//!
//! - `Blob`, `BlobId`, `BlobKind`: records of the content store and their class
//! - `TextFragment`, `FieldTag`: text recovered from binary blobs
//! - `ArchiveLocation`, `ChronoEntry`, `Provenance`: chronological index rows

pub mod archive;
pub mod blob;

pub use archive::{ArchiveLocation, ChronoEntry, Provenance};
pub use blob::{Blob, BlobId, BlobKind, FieldTag, TextFragment};
