//! Secret sources and the best-effort batch importer.

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::error::Result;
use crate::store::SecretStore;

/// A place secrets can be loaded from.
#[derive(Clone)]
pub enum SecretSource {
    /// Process environment variables starting with `prefix`.
    Env { prefix: String },
    /// A `KEY=VALUE` env file.
    Dotenv(PathBuf),
    /// A plaintext flat JSON object.
    Json(PathBuf),
    /// An encrypted envelope file and the key that opens it.
    Encrypted {
        path: PathBuf,
        key: Zeroizing<Vec<u8>>,
    },
}

impl SecretSource {
    pub fn encrypted(path: impl Into<PathBuf>, key: &[u8]) -> Self {
        Self::Encrypted {
            path: path.into(),
            key: Zeroizing::new(key.to_vec()),
        }
    }

    /// Human-readable description, never including key material.
    pub fn label(&self) -> String {
        match self {
            Self::Env { prefix } => format!("env:{prefix}*"),
            Self::Dotenv(path) => format!("dotenv:{}", path.display()),
            Self::Json(path) => format!("json:{}", path.display()),
            Self::Encrypted { path, .. } => format!("encrypted:{}", path.display()),
        }
    }
}

impl fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl SecretStore {
    /// Load one source, all-or-nothing. Returns the number of entries merged.
    pub fn load(&self, source: &SecretSource) -> Result<usize> {
        match source {
            SecretSource::Env { prefix } => Ok(self.load_from_env(prefix)),
            SecretSource::Dotenv(path) => self.load_from_dotenv_file(path),
            SecretSource::Json(path) => self.load_from_file(path),
            SecretSource::Encrypted { path, key } => self.load_encrypted_from_file(path, key),
        }
    }

    /// Load every source in order, stopping at the first failure.
    ///
    /// Sources loaded before the failure stay merged.
    pub fn load_all(&self, sources: &[SecretSource]) -> Result<usize> {
        let mut total = 0;
        for source in sources {
            total += self.load(source)?;
        }
        Ok(total)
    }
}

/// Outcome of [`import_best_effort`].
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Source label and number of entries merged.
    pub loaded: Vec<(String, usize)>,
    /// Source label and the error that caused it to be skipped.
    pub failed: Vec<(String, String)>,
}

impl ImportReport {
    pub fn total_loaded(&self) -> usize {
        self.loaded.iter().map(|(_, n)| n).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Load each source into `store`, logging and skipping the ones that fail.
///
/// Each source is still all-or-nothing: a skipped source contributes no
/// entries.
pub fn import_best_effort(store: &SecretStore, sources: &[SecretSource]) -> ImportReport {
    let mut report = ImportReport::default();

    for source in sources {
        let label = source.label();
        match store.load(source) {
            Ok(count) => report.loaded.push((label, count)),
            Err(e) => {
                warn!(source = %label, "skipping secret source: {e}");
                report.failed.push((label, e.to_string()));
            }
        }
    }

    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        entries = report.total_loaded(),
        "secret import finished"
    );
    report
}
