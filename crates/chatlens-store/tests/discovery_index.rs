//! End-to-end: discover SQLite archives on disk and order them.

use std::fs;
use std::path::Path;

use chatlens_core::{build_chrono_index, ChronoEntry, Provenance};
use chatlens_store::{resolve_archive_location, ArchiveCatalog, FsArchiveCatalog};
use rusqlite::{params, Connection};

fn write_archive(path: &Path, envelope_hex: Option<&str>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE meta (key TEXT PRIMARY KEY, value TEXT);
         CREATE TABLE blobs (id TEXT PRIMARY KEY, data BLOB);",
    )
    .unwrap();
    if let Some(hex_value) = envelope_hex {
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('0', ?1)",
            params![hex_value],
        )
        .unwrap();
    }
}

fn index_dir(root: &Path) -> Vec<ChronoEntry> {
    let files = FsArchiveCatalog::new(root).list_archive_locations().unwrap();
    build_chrono_index(files.iter().map(resolve_archive_location))
}

#[test]
fn index_orders_by_envelope_then_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    // createdAt in 2001: older than any file written by this test
    let old = hex::encode(r#"{"agentId":"old","name":"first chat","createdAt":1000000000000}"#);
    write_archive(&root.join("b/agent/store.db"), Some(&old));
    write_archive(&root.join("a/agent/store.db"), None);
    write_archive(&root.join("c/agent/store.db"), Some("not-hex"));
    fs::write(root.join("c/agent/store.db-wal"), b"").unwrap();

    let catalog = FsArchiveCatalog::new(root);
    assert_eq!(catalog.list_archive_locations().unwrap().len(), 3);

    let entries = index_dir(root);
    assert_eq!(entries.len(), 3);

    assert!(entries[0].location.ends_with("b/agent/store.db"));
    assert_eq!(entries[0].provenance, Provenance::Envelope);
    assert_eq!(entries[0].timestamp, 1_000_000_000);
    assert_eq!(entries[0].name(), Some("first chat"));

    for entry in &entries[1..] {
        assert_eq!(entry.provenance, Provenance::FilesystemFallback);
        assert!(entry.envelope.is_none());
    }
    // the remaining order is by mtime, then path
    assert!(entries[1].timestamp <= entries[2].timestamp);
    if entries[1].timestamp == entries[2].timestamp {
        assert!(entries[1].location < entries[2].location);
    }
}

#[test]
fn non_database_files_fall_back_to_mtime() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.db"), b"not a sqlite file").unwrap();

    let entries = index_dir(dir.path());
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].provenance, Provenance::FilesystemFallback);
}
