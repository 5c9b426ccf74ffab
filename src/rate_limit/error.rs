//! Rate Limiter Error Types
//!
//! A denied request is not an error — it is the normal `allowed = false`
//! decision. Errors here mean the caller misused the API or the durable
//! store failed.

use thiserror::Error;

use crate::store::StoreError;

/// Error types for admission checks
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Limit and window must both be positive
    #[error("Invalid rate limit parameters: limit={limit}, window_ms={window_ms}")]
    InvalidParams { limit: u32, window_ms: i64 },

    /// The durable state write or read failed; propagated, never masked
    #[error("Rate state store error: {0}")]
    Store(#[from] StoreError),
}
