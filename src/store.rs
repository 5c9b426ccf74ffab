//! Shared Store Error Type
//!
//! Both the credential pool and the rate admission actor persist through
//! store contracts; failures of the backing store surface as this error and
//! are always propagated, never masked.

use thiserror::Error;

/// Error types for persistence operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A persisted record could not be encoded or decoded
    #[error("Record serialization failed: {0}")]
    Serialization(String),

    /// Filesystem-level failure for file-backed stores
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
