//! Password-based key derivation with PBKDF2-HMAC-SHA256.
//!
//! A derived key is a pure function of `(password, salt, iterations,
//! key_len)`. The salt is not secret but must be stored so the same key can
//! be re-derived at decryption time; the key itself is never persisted.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, SecretError};

/// Default number of PBKDF2 rounds.
pub const DEFAULT_ITERATIONS: u32 = 10_000;

/// Default salt length in bytes.
pub const DEFAULT_SALT_LEN: usize = 16;

/// Default derived key length in bytes (AES-256).
pub const DEFAULT_KEY_LEN: usize = 32;

/// Tunable key derivation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub iterations: u32,
    pub salt_len: usize,
    pub key_len: usize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            salt_len: DEFAULT_SALT_LEN,
            key_len: DEFAULT_KEY_LEN,
        }
    }
}

impl KdfParams {
    /// Derive a key from `password` with a caller-supplied salt.
    pub fn derive(&self, password: &str, salt: &[u8]) -> DerivedKey {
        derive(password, salt, self.iterations, self.key_len)
    }

    /// Derive a key from `password` with a freshly generated salt.
    pub fn derive_new(&self, password: &str) -> Result<DerivedKey> {
        let salt = generate_salt(self.salt_len)?;
        Ok(self.derive(password, &salt))
    }
}

/// A key produced by [`derive`], together with the salt and round count
/// needed to reproduce it.
///
/// Key bytes are zeroed on drop and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
    #[zeroize(skip)]
    salt: Vec<u8>,
    #[zeroize(skip)]
    iterations: u32,
}

impl DerivedKey {
    /// Raw key bytes. Use sparingly.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Base64 form of the salt, for storing next to the ciphertext.
    pub fn salt_base64(&self) -> String {
        BASE64.encode(&self.salt)
    }

    /// Base64 form of the key bytes.
    pub fn to_base64(&self) -> String {
        encode_key(&self.key)
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .field("salt", &self.salt_base64())
            .field("iterations", &self.iterations)
            .finish()
    }
}

/// Stretch `password` into `key_len` bytes using PBKDF2-HMAC-SHA256.
///
/// An iteration count of zero is treated as one round.
pub fn derive(password: &str, salt: &[u8], iterations: u32, key_len: usize) -> DerivedKey {
    let mut key = vec![0u8; key_len];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations.max(1), &mut key);
    DerivedKey {
        key,
        salt: salt.to_vec(),
        iterations: iterations.max(1),
    }
}

/// Fill `len` bytes from the operating system's secure random source.
pub fn generate_salt(len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| SecretError::Crypto(format!("random source unavailable: {e}")))?;
    Ok(salt)
}

/// Generate a fresh salt and derive a key with the default parameters.
pub fn derive_with_defaults(password: &str) -> Result<DerivedKey> {
    KdfParams::default().derive_new(password)
}

/// Re-derive a key with the default parameters from a previously stored salt.
pub fn derive_with_salt(password: &str, salt: &[u8]) -> DerivedKey {
    KdfParams::default().derive(password, salt)
}

/// Encode raw key bytes as standard base64.
pub fn encode_key(key: &[u8]) -> String {
    BASE64.encode(key)
}

/// Decode a base64 key produced by [`encode_key`].
pub fn decode_key(encoded: &str) -> Result<Vec<u8>> {
    Ok(BASE64.decode(encoded.trim())?)
}
