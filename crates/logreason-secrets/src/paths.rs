//! Default file locations.

use std::path::PathBuf;

use crate::error::{Result, SecretError};

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "LOGREASON_HOME";

/// Get the LogReason base directory (`$LOGREASON_HOME` or `~/.logreason`).
pub fn base_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let home = dirs::home_dir().ok_or_else(|| {
        SecretError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not determine home directory",
        ))
    })?;
    Ok(home.join(".logreason"))
}

/// Get the secrets config file path (`secrets.json5`).
pub fn config_file() -> Result<PathBuf> {
    Ok(base_dir()?.join("secrets.json5"))
}

/// Get the plaintext secrets file path (`secrets.json`).
pub fn secrets_file() -> Result<PathBuf> {
    Ok(base_dir()?.join("secrets.json"))
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
