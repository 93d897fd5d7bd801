//! Secret management for LogReason.
//!
//! An in-memory [`SecretStore`] that can be populated from the process
//! environment, dotenv files, and plaintext or AES-256-GCM encrypted JSON
//! files, with PBKDF2-SHA256 password-derived keys.

pub mod cipher;
pub mod config;
pub mod dotenv;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod paths;
pub mod source;
pub mod store;

pub use config::SecretsConfig;
pub use envelope::Envelope;
pub use error::{Result, SecretError};
pub use kdf::{DerivedKey, KdfParams};
pub use source::{import_best_effort, ImportReport, SecretSource};
pub use store::SecretStore;
