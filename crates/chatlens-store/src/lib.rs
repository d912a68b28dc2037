//! chatlens-store: archive access for chatlens
//!
//! Everything that touches the disk lives here, behind two small traits:
//!
//! - `ArchiveStore`: the `meta` and `blobs` tables of one archive
//! - `ArchiveCatalog`: the set of archives and their modification times
//!
//! `SqliteArchiveStore` opens archives strictly read-only; `FsArchiveCatalog`
//! finds them with a recursive walk. In-memory fakes are in [`fakes`].

pub mod catalog;
mod error;
pub mod fakes;
pub mod resolve;
pub mod sqlite;
pub mod storage_traits;

pub use catalog::FsArchiveCatalog;
pub use error::StoreError;
pub use resolve::{archive_location, resolve_archive_location};
pub use sqlite::SqliteArchiveStore;
pub use storage_traits::{
    ArchiveCatalog, ArchiveFile, ArchiveStore, MetaEntry, StoreResult,
};
