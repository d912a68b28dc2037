//! Read-only SQLite archive store.
//!
//! Layout expected on disk:
//!
//! ```sql
//! CREATE TABLE meta  (key TEXT PRIMARY KEY, value TEXT);
//! CREATE TABLE blobs (id  TEXT PRIMARY KEY, data BLOB);
//! ```
//!
//! Column affinity is not trusted: `meta.value` and `blobs.data` are read
//! whatever their storage class (TEXT, BLOB, INTEGER, NULL).

use std::path::Path;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use chatlens_core::{Blob, BlobId};

use crate::error::StoreError;
use crate::storage_traits::{ArchiveStore, MetaEntry, StoreResult};

/// A single archive opened read-only.
pub struct SqliteArchiveStore {
    conn: Connection,
}

impl SqliteArchiveStore {
    /// Open `path` read-only. The file must exist; nothing is ever created.
    pub fn open_read_only(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(StoreError::ArchiveNotFound {
                path: path.display().to_string(),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // the chat client may hold a write lock while we read
        conn.busy_timeout(Duration::from_millis(1000))?;
        debug!(path = %path.display(), "opened archive read-only");
        Ok(Self { conn })
    }
}

impl ArchiveStore for SqliteArchiveStore {
    fn metadata_value(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| Ok(value_to_string(row.get_ref(0)?)),
            )
            .optional()?;
        Ok(value)
    }

    fn metadata_entries(&self) -> StoreResult<Vec<MetaEntry>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM meta")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(MetaEntry {
                    key: value_to_string(row.get_ref(0)?),
                    value: value_to_string(row.get_ref(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_blobs(&self) -> StoreResult<Vec<Blob>> {
        let mut stmt = self.conn.prepare("SELECT id, data FROM blobs")?;
        let blobs = stmt
            .query_map([], |row| {
                Ok(Blob::new(
                    BlobId(value_to_string(row.get_ref(0)?)),
                    value_to_bytes(row.get_ref(1)?),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(blobs)
    }

    fn get_blob(&self, id: &BlobId) -> StoreResult<Option<Blob>> {
        let blob = self
            .conn
            .query_row(
                "SELECT id, data FROM blobs WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok(Blob::new(
                        BlobId(value_to_string(row.get_ref(0)?)),
                        value_to_bytes(row.get_ref(1)?),
                    ))
                },
            )
            .optional()?;
        Ok(blob)
    }
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    }
}

fn value_to_bytes(value: ValueRef<'_>) -> Vec<u8> {
    match value {
        ValueRef::Null => Vec::new(),
        ValueRef::Integer(i) => i.to_string().into_bytes(),
        ValueRef::Real(f) => f.to_string().into_bytes(),
        ValueRef::Text(t) | ValueRef::Blob(t) => t.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_archive(dir: &Path) -> PathBuf {
        let path = dir.join("store.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE meta (key TEXT PRIMARY KEY, value TEXT);
             CREATE TABLE blobs (id TEXT PRIMARY KEY, data BLOB);
             INSERT INTO meta VALUES ('0', '7b7d');
             INSERT INTO blobs VALUES ('b1', X'0A0568656C6C6F');
             INSERT INTO blobs VALUES ('b2', NULL);
             INSERT INTO blobs VALUES ('b3', 'text stored as TEXT');",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        match SqliteArchiveStore::open_read_only(dir.path().join("nope.db")) {
            Err(StoreError::ArchiveNotFound { path }) => assert!(path.ends_with("nope.db")),
            Err(other) => panic!("expected ArchiveNotFound, got {other:?}"),
            Ok(_) => panic!("expected ArchiveNotFound, got a store"),
        }
        assert!(!dir.path().join("nope.db").exists());
    }

    #[test]
    fn test_reads_mixed_storage_classes() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteArchiveStore::open_read_only(make_archive(dir.path())).unwrap();

        assert_eq!(store.envelope_hex().unwrap().as_deref(), Some("7b7d"));
        let blobs = store.list_blobs().unwrap();
        assert_eq!(blobs.len(), 3);
        let b2 = store.get_blob(&BlobId::from("b2")).unwrap().unwrap();
        assert!(b2.is_empty());
        let b3 = store.get_blob(&BlobId::from("b3")).unwrap().unwrap();
        assert_eq!(b3.data, b"text stored as TEXT");
        assert!(store.get_blob(&BlobId::from("missing")).unwrap().is_none());
    }

    #[test]
    fn test_store_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteArchiveStore::open_read_only(make_archive(dir.path())).unwrap();
        let res = store.conn.execute("DELETE FROM blobs", []);
        assert!(res.is_err());
    }

    #[test]
    fn test_non_database_file_errors_on_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, b"this is not sqlite at all, just some bytes padding it out").unwrap();
        let result = SqliteArchiveStore::open_read_only(&path).and_then(|s| s.list_blobs());
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
    }
}
