//! Credential Store Contract
//!
//! The store is the single source of truth for credentials. The concrete
//! persistence technology is out of scope; only this contract matters. An
//! in-memory implementation backs tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::StoreError;

use super::credential::{Credential, CredentialUpdate, Provider};

/// Persistence contract consumed by the credential pool.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Select one eligible credential for `provider` and stamp its
    /// `last_used_at` to `now` in the same store operation.
    ///
    /// Eligible means active, or cooldown with an elapsed deadline. Among
    /// multiple eligible credentials the least recently used wins, with
    /// never-used (`last_used_at = None`) first, to approximate rotation.
    ///
    /// `Ok(None)` means no credential is eligible — distinct from `Err`,
    /// which means the store itself failed.
    async fn get_eligible_credential(
        &self,
        provider: Provider,
        now: DateTime<Utc>,
    ) -> Result<Option<Credential>, StoreError>;

    /// Apply a partial update to the credential with `id`.
    async fn update_credential(&self, id: &str, update: CredentialUpdate)
        -> Result<(), StoreError>;
}

/// In-memory credential store.
///
/// Selection and the `last_used_at` stamp happen under one write lock, so
/// concurrent callers never pick the same credential as most-stale.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    credentials: Arc<RwLock<HashMap<String, Credential>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a credential (admin provisioning path)
    pub async fn insert(&self, credential: Credential) {
        let mut credentials = self.credentials.write().await;
        credentials.insert(credential.id.clone(), credential);
    }

    /// Fetch a credential by id
    pub async fn get(&self, id: &str) -> Option<Credential> {
        let credentials = self.credentials.read().await;
        credentials.get(id).cloned()
    }

    /// Number of credentials held, regardless of status
    pub async fn count(&self) -> usize {
        let credentials = self.credentials.read().await;
        credentials.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_eligible_credential(
        &self,
        provider: Provider,
        now: DateTime<Utc>,
    ) -> Result<Option<Credential>, StoreError> {
        let mut credentials = self.credentials.write().await;

        // Least-recently-used first, nulls (never used) before everything
        let selected_id = credentials
            .values()
            .filter(|c| c.provider == provider && c.is_eligible(now))
            .min_by(|a, b| match (a.last_used_at, b.last_used_at) {
                (None, None) => a.id.cmp(&b.id),
                (None, Some(_)) => std::cmp::Ordering::Less,
                (Some(_), None) => std::cmp::Ordering::Greater,
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
            })
            .map(|c| c.id.clone());

        let Some(id) = selected_id else {
            return Ok(None);
        };

        let credential = credentials
            .get_mut(&id)
            .ok_or_else(|| StoreError::Unavailable(format!("credential {id} vanished")))?;
        credential.last_used_at = Some(now);
        Ok(Some(credential.clone()))
    }

    async fn update_credential(
        &self,
        id: &str,
        update: CredentialUpdate,
    ) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write().await;
        let credential = credentials
            .get_mut(id)
            .ok_or_else(|| StoreError::Unavailable(format!("unknown credential: {id}")))?;

        if let Some(status) = update.status {
            credential.status = status;
        }
        if let Some(deadline) = update.cooldown_until {
            credential.cooldown_until = Some(deadline);
        }
        if let Some(used_at) = update.last_used_at {
            credential.last_used_at = Some(used_at);
        }
        Ok(())
    }
}
