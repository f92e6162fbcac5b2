//! Contract tests for store backends.
//!
//! These tests validate the `Store` trait contract and run against every
//! backend.

use tabledb_storage::backends::{MemoryStore, RedbStore};
use tabledb_storage::{ListOptions, Store};

/// Run the standard contract suite against a store.
fn run_suite<S: Store>(store: &S) {
    test_write_read_delete(store);
    test_overwrite(store);
    test_prefix_isolation(store);
    test_list_order_and_pagination(store);
    test_reverse_scan(store);
}

fn test_write_read_delete<S: Store>(store: &S) {
    store.write(b"basic/a", b"1").expect("write failed");
    assert_eq!(store.read(b"basic/a").expect("read failed"), Some(b"1".to_vec()));

    store.delete(b"basic/a").expect("delete failed");
    assert_eq!(store.read(b"basic/a").expect("read failed"), None);

    // Deleting a missing key succeeds silently.
    store.delete(b"basic/missing").expect("idempotent delete failed");
}

fn test_overwrite<S: Store>(store: &S) {
    store.write(b"over/k", b"old").expect("write failed");
    store.write(b"over/k", b"new").expect("overwrite failed");
    assert_eq!(store.read(b"over/k").expect("read failed"), Some(b"new".to_vec()));
}

fn test_prefix_isolation<S: Store>(store: &S) {
    store.write(b"iso/a/1", b"x").expect("write failed");
    store.write(b"iso/a/2", b"y").expect("write failed");
    store.write(b"iso/b/1", b"z").expect("write failed");

    let pairs = store.list(b"iso/a/", ListOptions::default()).expect("list failed");
    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|(k, _)| k.starts_with(b"iso/a/")));
}

fn test_list_order_and_pagination<S: Store>(store: &S) {
    for key in [&b"page/3"[..], b"page/1", b"page/5", b"page/2", b"page/4"] {
        store.write(key, b"v").expect("write failed");
    }

    let all = store.list(b"page/", ListOptions::default()).expect("list failed");
    let keys: Vec<_> = all.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![
        b"page/1".to_vec(),
        b"page/2".to_vec(),
        b"page/3".to_vec(),
        b"page/4".to_vec(),
        b"page/5".to_vec(),
    ]);

    let limited = store
        .list(b"page/", ListOptions { limit: 2, offset: 0, reverse: false })
        .expect("list failed");
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].0, b"page/1");

    let offset = store
        .list(b"page/", ListOptions { limit: 2, offset: 3, reverse: false })
        .expect("list failed");
    assert_eq!(offset.len(), 2);
    assert_eq!(offset[0].0, b"page/4");
    assert_eq!(offset[1].0, b"page/5");
}

fn test_reverse_scan<S: Store>(store: &S) {
    for key in [&b"rev/1"[..], b"rev/2", b"rev/3"] {
        store.write(key, b"v").expect("write failed");
    }

    let reversed = store
        .list(b"rev/", ListOptions { limit: 0, offset: 0, reverse: true })
        .expect("list failed");
    let keys: Vec<_> = reversed.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![b"rev/3".to_vec(), b"rev/2".to_vec(), b"rev/1".to_vec()]);

    // Offset applies from the end when reversed.
    let tail = store
        .list(b"rev/", ListOptions { limit: 1, offset: 1, reverse: true })
        .expect("list failed");
    assert_eq!(tail[0].0, b"rev/2");
}

#[test]
fn memory_store_contract() {
    let store = MemoryStore::new();
    run_suite(&store);
}

#[test]
fn redb_store_contract() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let store = RedbStore::open(dir.path().join("store.redb")).expect("failed to open store");
    run_suite(&store);
}

#[test]
fn redb_in_memory_contract() {
    let store = RedbStore::in_memory().expect("failed to create store");
    run_suite(&store);
}

#[test]
fn empty_store_lists_nothing() {
    let store = MemoryStore::new();
    assert!(store.list(b"any/", ListOptions::default()).expect("list failed").is_empty());

    let redb = RedbStore::in_memory().expect("failed to create store");
    assert!(redb.list(b"any/", ListOptions::default()).expect("list failed").is_empty());
    assert_eq!(redb.read(b"any").expect("read failed"), None);
}

#[test]
fn arc_shares_a_store() {
    use std::sync::Arc;

    let store = Arc::new(MemoryStore::new());
    let clone = Arc::clone(&store);
    clone.write(b"shared/k", b"v").expect("write failed");
    assert_eq!(store.read(b"shared/k").expect("read failed"), Some(b"v".to_vec()));
}
