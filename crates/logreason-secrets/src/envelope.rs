//! On-disk envelope for encrypted secrets.
//!
//! ```json
//! { "nonce": "<base64, 12 bytes>", "secrets": "<base64, ciphertext || tag>" }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::cipher::{self, NONCE_LEN};
use crate::error::{Result, SecretError};

/// Nonce and ciphertext, both base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub nonce: String,
    pub secrets: String,
}

impl Envelope {
    /// Encrypt `plaintext` under `key` with a freshly generated nonce.
    pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Self> {
        let nonce = cipher::generate_nonce()?;
        let ciphertext = cipher::encrypt(plaintext, key, &nonce)?;
        Ok(Self {
            nonce: BASE64.encode(nonce),
            secrets: BASE64.encode(ciphertext),
        })
    }

    /// Decode both fields and decrypt the payload.
    pub fn open(&self, key: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        let nonce = BASE64.decode(&self.nonce)?;
        if nonce.len() != NONCE_LEN {
            return Err(SecretError::Parse(format!(
                "envelope nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            )));
        }
        let ciphertext = BASE64.decode(&self.secrets)?;
        cipher::decrypt(&ciphertext, key, &nonce)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}
