//! AES-256-GCM authenticated encryption.
//!
//! The caller supplies both the key and the nonce. Ciphertext carries the
//! 16-byte authentication tag appended, so there is no separate tag field.
//! A nonce must never be reused under the same key; use [`generate_nonce`]
//! for every encryption.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, SecretError};

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;

/// Required nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

fn cipher_for(key: &[u8], nonce: &[u8]) -> Result<Aes256Gcm> {
    if key.len() != KEY_LEN {
        return Err(SecretError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    if nonce.len() != NONCE_LEN {
        return Err(SecretError::InvalidNonceLength {
            expected: NONCE_LEN,
            actual: nonce.len(),
        });
    }
    Aes256Gcm::new_from_slice(key).map_err(|e| SecretError::Crypto(e.to_string()))
}

/// Encrypt `plaintext` under `key` and `nonce`.
pub fn encrypt(plaintext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Vec<u8>> {
    let cipher = cipher_for(key, nonce)?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| SecretError::Crypto("encryption failed".to_string()))
}

/// Decrypt and authenticate `ciphertext`.
///
/// A wrong key, a wrong nonce, and corrupted data all fail the same way.
pub fn decrypt(ciphertext: &[u8], key: &[u8], nonce: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = cipher_for(key, nonce)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| SecretError::Crypto("authentication failed".to_string()))
}

/// Generate a random nonce from the OS random source.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| SecretError::Crypto(format!("random source unavailable: {e}")))?;
    Ok(nonce)
}

/// Generate a random 256-bit key.
pub fn generate_key() -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; KEY_LEN]);
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| SecretError::Crypto(format!("random source unavailable: {e}")))?;
    Ok(key)
}
