//! Credential Pool Error Types

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::store::StoreError;

/// Error types for credential pool operations.
///
/// "No eligible credential" is deliberately not an error — the pool returns
/// `Ok(None)` so callers can tell "try later" apart from real failures.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The backing store failed; never retried internally
    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    /// Decryption of a stored secret failed (wrong key or corrupt blob)
    #[error("Credential decryption error: {0}")]
    Crypto(#[from] CryptoError),
}
