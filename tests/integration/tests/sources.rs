//! Multi-source loading integration tests.

use std::fs;

use logreason_secrets::{
    cipher, import_best_effort, SecretError, SecretSource, SecretStore, SecretsConfig,
};
use tempfile::TempDir;

#[test]
fn test_env_prefix_ingestion() {
    std::env::set_var("TEST_SECRET_KEY1", "value1");
    std::env::set_var("TEST_SECRET_KEY2", "value2");
    std::env::set_var("OTHER_PREFIX_KEY", "other_value");

    let store = SecretStore::new();
    store.load_from_env("TEST_SECRET_");

    assert_eq!(store.get("KEY1").as_deref(), Some("value1"));
    assert_eq!(store.get("KEY2").as_deref(), Some("value2"));
    assert!(!store.contains("OTHER_PREFIX_KEY"));
    assert!(store
        .names()
        .iter()
        .all(|name| name == "KEY1" || name == "KEY2"));
}

#[test]
fn test_dotenv_ingestion() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".env");
    fs::write(
        &path,
        "API_KEY=abc\n# comment\n\nDATABASE_URL=\"postgres://x\"\n",
    )
    .unwrap();

    let store = SecretStore::new();
    store.load_from_dotenv_file(&path).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get("API_KEY").as_deref(), Some("abc"));
    assert_eq!(store.get("DATABASE_URL").as_deref(), Some("postgres://x"));
}

#[test]
fn test_config_file_drives_loading() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("secrets.json");
    let sealed = dir.path().join("secrets.enc.json");
    let env_file = dir.path().join(".env");
    let config_path = dir.path().join("secrets.json5");

    fs::write(&json, r#"{"SHARED": "json", "JSON_ONLY": "j"}"#).unwrap();
    fs::write(&env_file, "SHARED=dotenv\n").unwrap();
    std::env::set_var("CFG_IT_SHARED", "env");

    let key = cipher::generate_key().unwrap();
    let encrypted = SecretStore::new();
    encrypted.set("SEALED_ONLY", "s");
    encrypted.set("SHARED", "sealed");
    encrypted.save_encrypted_to_file(&sealed, &key).unwrap();

    fs::write(
        &config_path,
        format!(
            r#"{{
                env_prefix: "CFG_IT_",
                dotenv_file: {:?},
                secrets_file: {:?},
                encrypted_file: {:?},
            }}"#,
            env_file.display().to_string(),
            json.display().to_string(),
            sealed.display().to_string(),
        ),
    )
    .unwrap();

    let config = SecretsConfig::load(&config_path).unwrap();
    let store = SecretStore::from_config(&config, Some(key.as_slice())).unwrap();

    assert_eq!(store.get("SHARED").as_deref(), Some("env"));
    assert_eq!(store.get("JSON_ONLY").as_deref(), Some("j"));
    assert_eq!(store.get("SEALED_ONLY").as_deref(), Some("s"));
}

#[test]
fn test_strict_load_reports_first_error_kind() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"a": 1}"#).unwrap();

    let store = SecretStore::new();
    let result = store.load_all(&[SecretSource::Json(bad)]);
    assert!(matches!(result, Err(SecretError::Parse(_))));
    assert!(store.is_empty());
}

#[test]
fn test_best_effort_import_keeps_good_sources() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.json");
    let sealed = dir.path().join("sealed.json");
    fs::write(&good, r#"{"GOOD": "yes"}"#).unwrap();

    let key = cipher::generate_key().unwrap();
    let other = cipher::generate_key().unwrap();
    let encrypted = SecretStore::new();
    encrypted.set("HIDDEN", "x");
    encrypted.save_encrypted_to_file(&sealed, &key).unwrap();

    let store = SecretStore::new();
    let report = import_best_effort(
        &store,
        &[
            SecretSource::encrypted(&sealed, &other),
            SecretSource::Json(good),
        ],
    );

    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].1.contains("Crypto"));
    assert_eq!(report.total_loaded(), 1);
    assert_eq!(store.names(), vec!["GOOD"]);
}
