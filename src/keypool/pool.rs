//! Credential Pool
//!
//! Selects usable provider credentials, decrypts their secrets, and applies
//! lifecycle transitions (cooldown on transient failure, permanent
//! invalidation on authentication failure).

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::crypto::{self, CryptoError, EncryptionKey};

use super::credential::{CredentialStatus, CredentialUpdate, Provider};
use super::error::PoolError;
use super::store::CredentialStore;

/// Default cooldown applied on transient provider failure: 5 minutes
pub const DEFAULT_COOLDOWN_MS: i64 = 5 * 60 * 1000;

/// A selected credential with its decrypted secret.
#[derive(Debug, Clone)]
pub struct SelectedCredential {
    /// Store id of the credential, for later lifecycle calls
    pub credential_id: String,

    /// Decrypted provider API key
    pub api_key: String,
}

/// Failure classes reported back by provider calls.
///
/// Gateway middleware maps provider HTTP status codes here so it never has
/// to know lifecycle rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    /// 401/403 — the credential was rejected outright
    Auth,
    /// 429 — the credential exhausted its upstream quota
    RateLimited,
}

impl ProviderFailure {
    /// Classify a provider HTTP status code; `None` for statuses that say
    /// nothing about credential health.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 | 403 => Some(ProviderFailure::Auth),
            429 => Some(ProviderFailure::RateLimited),
            _ => None,
        }
    }
}

/// Credential pool over a store contract and a process-wide encryption key.
#[derive(Clone)]
pub struct KeyPool {
    store: Arc<dyn CredentialStore>,
    key: EncryptionKey,
}

impl KeyPool {
    /// Create a pool over `store`, decrypting with `key`.
    pub fn new(store: Arc<dyn CredentialStore>, key: EncryptionKey) -> Self {
        Self { store, key }
    }

    /// Select a usable credential for `provider` and decrypt its secret.
    ///
    /// Returns `Ok(None)` when no credential is eligible — callers must
    /// treat this as "provider temporarily unavailable", not as a failure.
    pub async fn select_credential(
        &self,
        provider: Provider,
    ) -> Result<Option<SelectedCredential>, PoolError> {
        let now = Utc::now();
        let Some(credential) = self.store.get_eligible_credential(provider, now).await? else {
            return Ok(None);
        };

        let plaintext = crypto::decrypt(&credential.encrypted_secret, &self.key)?;
        let api_key = String::from_utf8(plaintext).map_err(|_| {
            CryptoError::DecryptionFailed("decrypted secret is not valid UTF-8".to_string())
        })?;

        Ok(Some(SelectedCredential {
            credential_id: credential.id,
            api_key,
        }))
    }

    /// Put a credential into cooldown until `now + cooldown_ms`.
    ///
    /// Idempotent: a repeated call overwrites the existing deadline.
    pub async fn mark_cooldown(&self, id: &str, cooldown_ms: i64) -> Result<(), PoolError> {
        let deadline = Utc::now() + Duration::milliseconds(cooldown_ms);
        self.store
            .update_credential(
                id,
                CredentialUpdate {
                    status: Some(CredentialStatus::Cooldown),
                    cooldown_until: Some(deadline),
                    last_used_at: None,
                },
            )
            .await?;
        info!(credential_id = id, until = %deadline, "credential placed in cooldown");
        Ok(())
    }

    /// Permanently invalidate a credential. Never reversed.
    pub async fn mark_invalid(&self, id: &str) -> Result<(), PoolError> {
        self.store
            .update_credential(
                id,
                CredentialUpdate {
                    status: Some(CredentialStatus::Invalid),
                    cooldown_until: None,
                    last_used_at: None,
                },
            )
            .await?;
        warn!(credential_id = id, "credential invalidated");
        Ok(())
    }

    /// Apply the lifecycle rule for a classified provider failure.
    pub async fn handle_failure(
        &self,
        id: &str,
        failure: ProviderFailure,
    ) -> Result<(), PoolError> {
        match failure {
            ProviderFailure::Auth => self.mark_invalid(id).await,
            ProviderFailure::RateLimited => self.mark_cooldown(id, DEFAULT_COOLDOWN_MS).await,
        }
    }
}
