//! AES-256-GCM encryption for provider credentials at rest.
//!
//! Wire format: [12 bytes: nonce][N bytes: ciphertext + tag]
//! The nonce is drawn fresh from the system CSPRNG on every call and is
//! never reused under the same key.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::error::CryptoError;

/// AES-GCM nonce length in bytes
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LENGTH: usize = 16;

/// AES-256 key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Process-wide symmetric key for credential encryption.
///
/// Configured at deploy time as a base64 string and passed explicitly into
/// every cipher call so key rotation never touches call sites.
#[derive(Clone)]
pub struct EncryptionKey {
    bytes: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    /// Create a key from raw 32-byte material.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: KEY_LENGTH,
                got: bytes.len(),
            });
        }
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Create a key from its base64 deploy-time encoding.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn cipher(&self) -> Result<Aes256Gcm, CryptoError> {
        Aes256Gcm::new_from_slice(&self.bytes)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak key material through Debug output
        f.write_str("EncryptionKey(..)")
    }
}

/// Generate a random 12-byte nonce.
fn generate_nonce() -> Result<[u8; NONCE_LENGTH], CryptoError> {
    let mut nonce = [0u8; NONCE_LENGTH];
    getrandom::getrandom(&mut nonce).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(nonce)
}

/// Encrypt plaintext with AES-256-GCM.
///
/// Returns `[nonce:12][ciphertext + tag]`.
pub fn encrypt(plaintext: &[u8], key: &EncryptionKey) -> Result<Vec<u8>, CryptoError> {
    let cipher = key.cipher()?;
    let nonce_bytes = generate_nonce()?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// A tampered or truncated blob, or the wrong key, fails with
/// [`CryptoError::DecryptionFailed`] / [`CryptoError::DataTooShort`] —
/// garbage is never returned.
pub fn decrypt(blob: &[u8], key: &EncryptionKey) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(CryptoError::DataTooShort);
    }

    let cipher = key.cipher()?;
    let nonce = Nonce::from_slice(&blob[..NONCE_LENGTH]);
    let ciphertext = &blob[NONCE_LENGTH..];

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
