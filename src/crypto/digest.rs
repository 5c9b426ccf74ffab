//! Digests, random tokens, and trust-boundary string handling.
//!
//! Everything here is pure and stateless; safe to call concurrently.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// SHA-256 digest, hex-encoded. Deterministic.
pub fn sha256_hex(data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

/// HMAC-SHA256 over `data` with `secret`, hex-encoded.
pub fn hmac_sha256_hex(data: &str, secret: &str) -> String {
    // HMAC accepts keys of any length, so new_from_slice cannot fail here
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generate a cryptographically secure random token.
///
/// `length` is the number of random bytes; the hex output is twice as long.
pub fn generate_token(length: usize) -> Result<String, CryptoError> {
    let mut bytes = vec![0u8; length];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// Default random-byte count for [`generate_token`]
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// Mask an API key for display.
///
/// Keys of 12 characters or fewer become all `*`; longer keys keep the first
/// and last 4 characters. Total length is always preserved. Display only —
/// never use the masked form for comparison.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

/// Constant-time string comparison for trust boundaries (bearer tokens).
///
/// Returns `false` immediately on length mismatch; this reveals the length of
/// the presented token but not of the secret. With equal lengths the runtime
/// is independent of where the inputs first differ.
pub fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
