//! CLI command implementations.

pub mod check;
pub mod crypt;
pub mod file;
pub mod keys;

use std::path::Path;

use anyhow::Context;
use logreason_secrets::{paths, SecretError, SecretsConfig};
use tracing::debug;

/// Load the secrets config.
///
/// An explicitly named file must exist; otherwise the default location is
/// used when present and built-in defaults when it is not.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SecretsConfig> {
    if let Some(path) = path {
        return SecretsConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default_path = paths::config_file()?;
    match SecretsConfig::load_default() {
        Ok(config) => Ok(config),
        Err(SecretError::NotFound(_)) => {
            debug!(path = %default_path.display(), "no config file, using defaults");
            Ok(SecretsConfig::default())
        }
        Err(e) => Err(e)
            .with_context(|| format!("Failed to load config {}", default_path.display())),
    }
}

/// Run blocking store I/O on the blocking thread pool.
pub(crate) async fn blocking<T, F>(f: F) -> anyhow::Result<T>
where
    F: FnOnce() -> logreason_secrets::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
