//! Trait contract tests for ArchiveStore.
//!
//! The same fixture is loaded into the in-memory fake and into a real SQLite
//! file; both implementations must answer identically.

use std::path::Path;

use chatlens_core::{classify, BlobId, BlobKind};
use chatlens_store::fakes::MemoryArchiveStore;
use chatlens_store::{ArchiveStore, SqliteArchiveStore};
use rusqlite::{params, Connection};

const ENVELOPE_JSON: &str = r#"{"agentId":"agent-1","name":"Fix flaky test","createdAt":1700000000000}"#;

fn fixture_blobs() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("chat-1", br#"{"role":"user","content":"why does this fail?"}"#.to_vec()),
        ("json-1", br#"{"kind":"checkpoint","nodes":[]}"#.to_vec()),
        ("bin-1", b"\x0a\x0bhello world\x12\x02ok".to_vec()),
        ("empty", Vec::new()),
    ]
}

fn fake_store() -> MemoryArchiveStore {
    let mut store = MemoryArchiveStore::new();
    store.set_envelope_json(ENVELOPE_JSON);
    store.set_metadata("1", "side-value");
    for (id, data) in fixture_blobs() {
        store.insert_blob(id, &data);
    }
    store
}

fn sqlite_store(dir: &Path) -> SqliteArchiveStore {
    let path = dir.join("store.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE meta (key TEXT PRIMARY KEY, value TEXT);
             CREATE TABLE blobs (id TEXT PRIMARY KEY, data BLOB);",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO meta (key, value) VALUES ('0', ?1)",
            params![hex::encode(ENVELOPE_JSON)],
        )
        .unwrap();
        conn.execute("INSERT INTO meta (key, value) VALUES ('1', 'side-value')", [])
            .unwrap();
        for (id, data) in fixture_blobs() {
            conn.execute(
                "INSERT INTO blobs (id, data) VALUES (?1, ?2)",
                params![id, data],
            )
            .unwrap();
        }
    }
    SqliteArchiveStore::open_read_only(&path).unwrap()
}

fn assert_contract(store: &impl ArchiveStore) {
    // envelope under key "0"
    let hex_value = store.envelope_hex().unwrap().expect("envelope present");
    let env = chatlens_core::decode_envelope(&hex_value).unwrap();
    assert_eq!(env.agent_id, "agent-1");
    assert_eq!(env.created_at_secs(), Some(1_700_000_000));

    // all meta rows
    let mut keys: Vec<_> = store
        .metadata_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["0", "1"]);
    assert_eq!(store.metadata_value("missing").unwrap(), None);

    // blobs round-trip byte for byte
    let mut blobs = store.list_blobs().unwrap();
    blobs.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(blobs.len(), 4);
    for (id, data) in fixture_blobs() {
        let blob = store.get_blob(&BlobId::from(id)).unwrap().expect("blob present");
        assert_eq!(blob.data, data, "blob {id}");
    }
    assert!(store.get_blob(&BlobId::from("nope")).unwrap().is_none());

    // classification over the stored bytes
    let kinds: Vec<_> = ["chat-1", "json-1", "bin-1", "empty"]
        .iter()
        .map(|id| classify(&store.get_blob(&BlobId::from(*id)).unwrap().unwrap().data))
        .collect();
    assert_eq!(
        kinds,
        vec![
            BlobKind::ConversationalJson,
            BlobKind::OtherJson,
            BlobKind::Binary,
            BlobKind::Binary,
        ]
    );
}

#[test]
fn memory_store_satisfies_contract() {
    assert_contract(&fake_store());
}

#[test]
fn sqlite_store_satisfies_contract() {
    let dir = tempfile::tempdir().unwrap();
    assert_contract(&sqlite_store(dir.path()));
}

#[test]
fn put_blob_is_content_addressed() {
    let mut store = MemoryArchiveStore::new();
    let a = store.put_blob(b"same bytes");
    let b = store.put_blob(b"same bytes");
    let c = store.put_blob(b"other bytes");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.as_str().len(), 64);
    assert_eq!(store.list_blobs().unwrap().len(), 2);
}
