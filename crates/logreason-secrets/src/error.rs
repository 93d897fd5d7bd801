//! Error types for secret management.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during secret operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("Invalid nonce length: expected {expected} bytes, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },
}

impl From<serde_json::Error> for SecretError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(format!("JSON: {e}"))
    }
}

impl From<json5::Error> for SecretError {
    fn from(e: json5::Error) -> Self {
        Self::Parse(format!("JSON5: {e}"))
    }
}

impl From<base64::DecodeError> for SecretError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Parse(format!("base64: {e}"))
    }
}

impl SecretError {
    /// Map an I/O error raised while reading `path`, reporting a missing
    /// file as [`SecretError::NotFound`].
    pub(crate) fn from_read(path: &std::path::Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io(e)
        }
    }
}

/// Convenience result alias for secret operations.
pub type Result<T> = std::result::Result<T, SecretError>;
