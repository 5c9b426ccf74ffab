//! Secret Cipher
//!
//! Symmetric encryption of provider credentials at rest, keyed digests,
//! secure random token generation, and constant-time comparison for trust
//! boundaries. Pure and stateless; the encryption key is passed explicitly
//! into every call.

pub mod cipher;
pub mod digest;
pub mod error;

pub use cipher::{decrypt, encrypt, EncryptionKey, KEY_LENGTH, NONCE_LENGTH, TAG_LENGTH};
pub use digest::{
    generate_token, hmac_sha256_hex, mask_key, secure_compare, sha256_hex, DEFAULT_TOKEN_LENGTH,
};
pub use error::CryptoError;
