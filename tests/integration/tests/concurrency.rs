//! Concurrent access integration tests.

use std::sync::Arc;
use std::thread;

use logreason_integration_tests::sample_store;
use logreason_secrets::SecretStore;
use tempfile::TempDir;

#[test]
fn test_concurrent_sets_on_distinct_names() {
    let store = Arc::new(SecretStore::new());
    let threads = 32;

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.set(format!("SECRET_{i}"), format!("value_{i}")))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), threads);
    for i in 0..threads {
        assert_eq!(
            store.get(&format!("SECRET_{i}")),
            Some(format!("value_{i}"))
        );
    }
}

#[test]
fn test_readers_never_see_partial_loads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.json");

    let batch = SecretStore::new();
    for i in 0..200 {
        batch.set(format!("K{i}"), "loaded");
    }
    batch.save_to_file(&path).unwrap();

    let store = Arc::new(SecretStore::new());
    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..500 {
                let len = store.get_all().len();
                assert!(len == 0 || len == 200, "observed partial merge of {len}");
            }
        })
    };

    store.load_from_file(&path).unwrap();
    reader.join().unwrap();
    assert_eq!(store.len(), 200);
}

#[test]
fn test_snapshot_is_stable_while_writers_run() {
    let store = Arc::new(sample_store());
    let snapshot = store.get_all();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..100 {
                store.set("GEOCODER_API_KEY", format!("rotated-{i}"));
            }
        })
    };
    writer.join().unwrap();

    assert_eq!(snapshot["GEOCODER_API_KEY"], "sk-live-0123456789");
    assert_eq!(store.get("GEOCODER_API_KEY").as_deref(), Some("rotated-99"));
}
