//! Filesystem archive discovery.
//!
//! Archives are the `*.db` files anywhere under the chats directory. SQLite
//! side files (`store.db-wal`, `store.db-shm`) do not carry the `db`
//! extension and are skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::storage_traits::{modified_secs, ArchiveCatalog, ArchiveFile, StoreResult};

const ARCHIVE_EXTENSION: &str = "db";

/// Catalog backed by a recursive directory walk.
#[derive(Debug, Clone)]
pub struct FsArchiveCatalog {
    root: PathBuf,
}

impl FsArchiveCatalog {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl ArchiveCatalog for FsArchiveCatalog {
    /// Archives sorted by path. Unreadable directories abort the walk.
    fn list_archive_locations(&self) -> StoreResult<Vec<ArchiveFile>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_archive_path(entry.path()) {
                continue;
            }
            let metadata = entry.metadata()?;
            files.push(ArchiveFile {
                path: entry.into_path(),
                modified_secs: modified_secs(&metadata),
            });
        }
        files.sort();
        tracing::debug!(root = %self.root.display(), count = files.len(), "discovered archives");
        Ok(files)
    }
}

fn is_archive_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
}
