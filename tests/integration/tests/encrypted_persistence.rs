//! Encrypted persistence integration tests.
//!
//! These tests exercise the full password -> key -> envelope -> store path
//! across fresh store instances, the way a process restart would.

use logreason_integration_tests::sample_store;
use logreason_secrets::{kdf, Envelope, KdfParams, SecretError, SecretStore};
use tempfile::TempDir;

#[test]
fn test_password_encrypted_round_trip_across_stores() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.enc.json");

    // First process: derive a fresh key and save.
    let derived = kdf::derive_with_defaults("correct horse battery staple").unwrap();
    let salt = derived.salt_base64();
    let original = sample_store();
    original.save_encrypted_to_file(&path, derived.key()).unwrap();
    drop(derived);

    // Second process: re-derive from the stored salt and load.
    let salt = kdf::decode_key(&salt).unwrap();
    let derived = kdf::derive_with_salt("correct horse battery staple", &salt);
    let loaded = SecretStore::new();
    loaded.load_encrypted_from_file(&path, derived.key()).unwrap();

    assert_eq!(loaded.get_all(), original.get_all());
}

#[test]
fn test_wrong_password_fails_and_store_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.enc.json");

    let derived = kdf::derive_with_defaults("right").unwrap();
    sample_store()
        .save_encrypted_to_file(&path, derived.key())
        .unwrap();

    let wrong = kdf::derive_with_salt("wrong", derived.salt());
    let store = SecretStore::new();
    store.set("PRE_EXISTING", "kept");

    let result = store.load_encrypted_from_file(&path, wrong.key());
    assert!(matches!(result, Err(SecretError::Crypto(_))));
    assert_eq!(store.names(), vec!["PRE_EXISTING"]);
}

#[test]
fn test_custom_iterations_change_the_key() {
    let salt = kdf::generate_salt(16).unwrap();
    let weak = KdfParams::default().derive("pw", &salt);
    let strong = KdfParams {
        iterations: 50_000,
        ..KdfParams::default()
    }
    .derive("pw", &salt);

    assert_ne!(weak.key(), strong.key());
}

#[test]
fn test_envelope_on_disk_shape() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("secrets.enc.json");
    let derived = kdf::derive_with_defaults("pw").unwrap();
    sample_store()
        .save_encrypted_to_file(&path, derived.key())
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object.contains_key("nonce"));
    assert!(object.contains_key("secrets"));
    assert!(!raw.contains("sk-live"));

    let envelope = Envelope::from_json(raw.as_bytes()).unwrap();
    let inner = envelope.open(derived.key()).unwrap();
    let inner: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&inner).unwrap();
    assert_eq!(inner["GEOCODER_API_KEY"], "sk-live-0123456789");
}

#[test]
fn test_each_save_uses_a_new_nonce() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    let derived = kdf::derive_with_defaults("pw").unwrap();

    let store = sample_store();
    store.save_encrypted_to_file(&a, derived.key()).unwrap();
    store.save_encrypted_to_file(&b, derived.key()).unwrap();

    let a = Envelope::from_json(&std::fs::read(&a).unwrap()).unwrap();
    let b = Envelope::from_json(&std::fs::read(&b).unwrap()).unwrap();
    assert_ne!(a.nonce, b.nonce);
}

#[test]
fn test_plaintext_and_encrypted_copies_agree() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("secrets.json");
    let sealed = dir.path().join("secrets.enc.json");
    let derived = kdf::derive_with_defaults("pw").unwrap();

    let store = sample_store();
    store.save_to_file(&plain).unwrap();
    store.save_encrypted_to_file(&sealed, derived.key()).unwrap();

    let from_plain = SecretStore::new();
    from_plain.load_from_file(&plain).unwrap();
    let from_sealed = SecretStore::new();
    from_sealed
        .load_encrypted_from_file(&sealed, derived.key())
        .unwrap();

    assert_eq!(from_plain.get_all(), from_sealed.get_all());
}
