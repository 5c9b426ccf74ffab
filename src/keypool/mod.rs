//! Credential Pool
//!
//! Tracks upstream provider credentials through an active/cooldown/invalid
//! lifecycle so one exhausted quota or revoked key never takes the whole
//! gateway down. Secrets are stored encrypted and only decrypted at
//! selection time; rotation approximates round-robin by preferring the
//! least recently used eligible credential.

pub mod credential;
pub mod error;
pub mod pool;
pub mod store;

pub use credential::{Credential, CredentialStatus, CredentialUpdate, Provider};
pub use error::PoolError;
pub use pool::{KeyPool, ProviderFailure, SelectedCredential, DEFAULT_COOLDOWN_MS};
pub use store::{CredentialStore, MemoryCredentialStore};
