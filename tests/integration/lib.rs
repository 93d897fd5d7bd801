//! Shared helpers for the integration test binaries.

use logreason_secrets::SecretStore;

/// A store holding a few representative secrets, including an empty value
/// and a value with JSON-significant characters.
pub fn sample_store() -> SecretStore {
    let store = SecretStore::new();
    store.set("GEOCODER_API_KEY", "sk-live-0123456789");
    store.set("DATABASE_URL", "postgres://user:p@ss@localhost/db?sslmode=require");
    store.set("QUOTED", "she said \"hi\"\n");
    store.set("EMPTY", "");
    store
}
