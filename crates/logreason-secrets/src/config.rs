//! Secret source configuration.
//!
//! Read from a JSON5 file such as:
//!
//! ```json5
//! {
//!   env_prefix: "LOGREASON_SECRET_",
//!   secrets_file: "~/.logreason/secrets.json",
//!   kdf: { iterations: 600000 },
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cipher;
use crate::error::{Result, SecretError};
use crate::kdf::KdfParams;
use crate::paths;
use crate::source::SecretSource;
use crate::store::SecretStore;

/// Smallest salt accepted by [`SecretsConfig::validate`].
const MIN_SALT_LEN: usize = 8;

/// Where secrets come from and how password keys are derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Prefix for environment variable ingestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_prefix: Option<String>,

    /// `KEY=VALUE` env file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv_file: Option<PathBuf>,

    /// Plaintext JSON secrets file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_file: Option<PathBuf>,

    /// Encrypted envelope file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_file: Option<PathBuf>,

    /// Password key derivation parameters.
    pub kdf: KdfParams,
}

impl SecretsConfig {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(&paths::config_file()?)
    }

    /// Load and validate configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SecretError::from_read(path, e))?;
        let config = Self::parse(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded secrets config");
        Ok(config)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(json5::from_str(content)?)
    }

    /// Save configuration as pretty JSON (valid JSON5).
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.kdf.iterations == 0 {
            errors.push("kdf.iterations must be at least 1".to_string());
        }
        if self.kdf.key_len != cipher::KEY_LEN {
            errors.push(format!(
                "kdf.key_len must be {}, got {}",
                cipher::KEY_LEN,
                self.kdf.key_len
            ));
        }
        if self.kdf.salt_len < MIN_SALT_LEN {
            errors.push(format!(
                "kdf.salt_len must be at least {MIN_SALT_LEN}, got {}",
                self.kdf.salt_len
            ));
        }
        if matches!(&self.env_prefix, Some(p) if p.is_empty()) {
            errors.push("env_prefix must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SecretError::Parse(errors.join("; ")))
        }
    }

    /// Configured sources in load order: plaintext file, encrypted file,
    /// env file, then environment. Later sources overwrite earlier ones.
    ///
    /// The encrypted file is left out when no key is supplied.
    pub fn sources(&self, key: Option<&[u8]>) -> Vec<SecretSource> {
        let mut sources = Vec::new();

        if let Some(path) = &self.secrets_file {
            sources.push(SecretSource::Json(expand(path)));
        }
        match (&self.encrypted_file, key) {
            (Some(path), Some(key)) => sources.push(SecretSource::encrypted(expand(path), key)),
            (Some(path), None) => {
                debug!(path = %path.display(), "no key supplied, skipping encrypted secrets")
            }
            _ => {}
        }
        if let Some(path) = &self.dotenv_file {
            sources.push(SecretSource::Dotenv(expand(path)));
        }
        if let Some(prefix) = &self.env_prefix {
            sources.push(SecretSource::Env {
                prefix: prefix.clone(),
            });
        }

        sources
    }
}

fn expand(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => paths::expand_tilde(s),
        None => path.to_path_buf(),
    }
}

impl SecretStore {
    /// Build a store from every configured source, failing on the first
    /// source that cannot be loaded.
    pub fn from_config(config: &SecretsConfig, key: Option<&[u8]>) -> Result<Self> {
        let store = Self::new();
        store.load_all(&config.sources(key))?;
        Ok(store)
    }
}
