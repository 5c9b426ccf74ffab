//! Crypto Module Error Types
//!
//! This module defines all error types that can occur during cipher and
//! digest operations.

use thiserror::Error;

/// Error types for crypto operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material is not valid base64
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Key material has the wrong length
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    /// Blob shorter than nonce + tag
    #[error("Encrypted data too short")]
    DataTooShort,

    /// AEAD encryption failure
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Integrity tag mismatch or corrupted ciphertext
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Random number generation failed
    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
