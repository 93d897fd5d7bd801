//! The in-memory secret store.
//!
//! [`SecretStore`] maps secret names to values behind a reader/writer lock.
//! Every loader reads and parses its input without holding the lock and
//! only takes the write lock to merge the parsed entries, so a failed load
//! never leaves a partial merge behind and readers are not blocked on disk.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tracing::debug;
use zeroize::Zeroizing;

use crate::dotenv;
use crate::envelope::Envelope;
use crate::error::{Result, SecretError};

/// A concurrency-safe collection of named secrets.
///
/// Stores are constructed explicitly and shared by reference (or `Arc`);
/// there is no process-wide instance.
#[derive(Default)]
pub struct SecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl SecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a secret.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.secrets.write().insert(name.into(), value.into());
    }

    /// Look up a secret by name.
    pub fn get(&self, name: &str) -> Option<String> {
        self.secrets.read().get(name).cloned()
    }

    /// Look up a secret, substituting `default` when it is absent.
    pub fn get_or_default(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    /// Snapshot of every entry. The returned map is independent of the store.
    pub fn get_all(&self) -> HashMap<String, String> {
        self.secrets.read().clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets.read().contains_key(name)
    }

    /// Remove a secret, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.secrets.write().remove(name)
    }

    /// Secret names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.secrets.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.read().is_empty()
    }

    /// Merge already-parsed entries under a single write lock.
    fn merge(&self, entries: impl IntoIterator<Item = (String, String)>) -> usize {
        let mut secrets = self.secrets.write();
        let mut count = 0;
        for (name, value) in entries {
            secrets.insert(name, value);
            count += 1;
        }
        count
    }

    /// Serialize the current entries as key-sorted JSON under the read lock.
    fn to_json(&self, pretty: bool) -> Result<Zeroizing<Vec<u8>>> {
        let secrets = self.secrets.read();
        let sorted: BTreeMap<&str, &str> = secrets
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let data = if pretty {
            serde_json::to_vec_pretty(&sorted)?
        } else {
            serde_json::to_vec(&sorted)?
        };
        Ok(Zeroizing::new(data))
    }

    /// Import every environment variable whose name starts with `prefix`,
    /// with the prefix stripped from the secret name.
    ///
    /// Variables that are not valid UTF-8, or whose name is exactly the
    /// prefix, are skipped. Returns the number of secrets imported.
    pub fn load_from_env(&self, prefix: &str) -> usize {
        let entries: Vec<(String, String)> = std::env::vars_os()
            .filter_map(|(name, value)| {
                let name = name.into_string().ok()?;
                let value = value.into_string().ok()?;
                let stripped = name.strip_prefix(prefix)?;
                if stripped.is_empty() {
                    return None;
                }
                Some((stripped.to_string(), value))
            })
            .collect();

        let count = self.merge(entries);
        debug!(prefix, count, "loaded secrets from environment");
        count
    }

    /// Import a single environment variable under its own name.
    ///
    /// Returns `false` when the variable is unset or not valid UTF-8.
    pub fn load_from_env_var(&self, name: &str) -> bool {
        match std::env::var(name) {
            Ok(value) => {
                self.set(name, value);
                true
            }
            Err(_) => false,
        }
    }

    /// Import `KEY=VALUE` lines from a dotenv file.
    pub fn load_from_dotenv_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = Zeroizing::new(
            fs::read_to_string(path).map_err(|e| SecretError::from_read(path, e))?,
        );

        let count = self.merge(dotenv::parse(&content));
        debug!(path = %path.display(), count, "loaded secrets from env file");
        Ok(count)
    }

    /// Import a flat JSON object of string values.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let data = read_secret_file(path)?;
        let entries = parse_flat_map(&data)?;

        let count = self.merge(entries);
        debug!(path = %path.display(), count, "loaded secrets from file");
        Ok(count)
    }

    /// Write every secret as pretty-printed JSON readable only by the owner.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_json(true)?;
        write_secret_file(path, &data)?;
        debug!(path = %path.display(), "saved secrets to file");
        Ok(())
    }

    /// Decrypt an [`Envelope`] file with `key` and import its contents.
    ///
    /// Any failure (missing file, malformed envelope, authentication
    /// failure, malformed inner JSON) leaves the store untouched.
    pub fn load_encrypted_from_file(&self, path: impl AsRef<Path>, key: &[u8]) -> Result<usize> {
        let path = path.as_ref();
        let data = read_secret_file(path)?;
        let envelope = Envelope::from_json(&data)?;
        let plaintext = envelope.open(key)?;
        let entries = parse_flat_map(&plaintext)?;

        let count = self.merge(entries);
        debug!(path = %path.display(), count, "loaded encrypted secrets");
        Ok(count)
    }

    /// Encrypt every secret under `key` with a fresh nonce and write the
    /// envelope readable only by the owner.
    pub fn save_encrypted_to_file(&self, path: impl AsRef<Path>, key: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let plaintext = self.to_json(false)?;
        let envelope = Envelope::seal(&plaintext, key)?;
        write_secret_file(path, &envelope.to_json_pretty()?)?;
        debug!(path = %path.display(), "saved encrypted secrets");
        Ok(())
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("entries", &self.len())
            .finish()
    }
}

fn parse_flat_map(data: &[u8]) -> Result<HashMap<String, String>> {
    serde_json::from_slice(data)
        .map_err(|e| SecretError::Parse(format!("expected a flat string map: {e}")))
}

fn read_secret_file(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    fs::read(path)
        .map(Zeroizing::new)
        .map_err(|e| SecretError::from_read(path, e))
}

/// Write `data` to `path` atomically, creating parent directories as needed.
///
/// The data is staged in a uniquely named, exclusively created 0600 file in
/// the target directory and then renamed over `path`.
fn write_secret_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(data)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
