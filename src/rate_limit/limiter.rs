//! Rate Limiter
//!
//! One logical admission actor per identity: all checks for one identity are
//! serialized behind that identity's own mutex, while different identities
//! proceed fully in parallel. Never a single global lock across identities.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::error::RateLimitError;
use super::store::RateStateStore;
use super::window::{Decision, WindowState};

/// Per-identity admission state.
///
/// `state` is `None` until the first check, which pulls any persisted
/// window from the store before lazily creating a fresh one.
#[derive(Debug)]
struct IdentityEntry {
    state: Option<WindowState>,
}

/// Per-identity fixed-window rate limiter with durable state.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateStateStore>,

    /// Sharded per-identity entries; the outer lock only guards map
    /// membership, admission itself runs under the per-identity mutex
    entries: Arc<RwLock<HashMap<String, Arc<Mutex<IdentityEntry>>>>>,
}

impl RateLimiter {
    /// Create a limiter over the given durable store.
    pub fn new(store: Arc<dyn RateStateStore>) -> Self {
        Self {
            store,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Run an admission check for `identity` against `(limit, window_ms)`.
    ///
    /// On admission the durable write completes before the decision is
    /// returned; rejections never touch storage.
    pub async fn check_limit(
        &self,
        identity: &str,
        limit: u32,
        window_ms: i64,
    ) -> Result<Decision, RateLimitError> {
        if limit == 0 || window_ms <= 0 {
            return Err(RateLimitError::InvalidParams { limit, window_ms });
        }

        let entry = self.entry_for(identity).await;
        let mut entry = entry.lock().await;

        let now_ms = Utc::now().timestamp_millis();

        // First touch in this process: recover persisted state, or start
        // a fresh window lazily
        let mut state = match entry.state {
            Some(state) => state,
            None => match self.store.load(identity).await? {
                Some(persisted) => persisted,
                None => WindowState::new(now_ms),
            },
        };

        let decision = state.check(now_ms, limit, window_ms);

        // The durable write must land before the allowed decision is
        // observable; rejections leave storage untouched
        if decision.allowed {
            self.store.save(identity, state).await?;
        }
        entry.state = Some(state);

        debug!(
            identity,
            allowed = decision.allowed,
            remaining = decision.remaining,
            "admission check"
        );
        Ok(decision)
    }

    /// Number of identities tracked in this process
    pub async fn tracked_identities(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    async fn entry_for(&self, identity: &str) -> Arc<Mutex<IdentityEntry>> {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(identity) {
                return entry.clone();
            }
        }

        let mut entries = self.entries.write().await;
        entries
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(IdentityEntry { state: None })))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::store::{FileRateStore, MemoryRateStore};

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryRateStore::new()))
    }

    #[tokio::test]
    async fn test_admits_within_limit_then_denies() {
        let limiter = limiter();

        for expected_remaining in [2, 1, 0] {
            let decision = limiter.check_limit("client-1", 3, 1_000).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = limiter.check_limit("client-1", 3, 1_000).await.unwrap();
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
    }

    #[tokio::test]
    async fn test_window_elapse_resets() {
        let limiter = limiter();

        for _ in 0..3 {
            limiter.check_limit("client-1", 3, 50).await.unwrap();
        }
        assert!(!limiter.check_limit("client-1", 3, 50).await.unwrap().allowed);

        tokio::time::sleep(std::time::Duration::from_millis(60)).await;

        let decision = limiter.check_limit("client-1", 3, 50).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let limiter = limiter();

        assert!(limiter.check_limit("a", 1, 60_000).await.unwrap().allowed);
        assert!(!limiter.check_limit("a", 1, 60_000).await.unwrap().allowed);

        // "b" still has its full budget
        let decision = limiter.check_limit("b", 1, 60_000).await.unwrap();
        assert!(decision.allowed);
        assert_eq!(limiter.tracked_identities().await, 2);
    }

    #[tokio::test]
    async fn test_rejects_zero_limit() {
        let limiter = limiter();
        assert!(matches!(
            limiter.check_limit("c", 0, 1_000).await,
            Err(RateLimitError::InvalidParams { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_window() {
        let limiter = limiter();
        assert!(matches!(
            limiter.check_limit("c", 5, 0).await,
            Err(RateLimitError::InvalidParams { .. })
        ));
        assert!(matches!(
            limiter.check_limit("c", 5, -1).await,
            Err(RateLimitError::InvalidParams { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejection_writes_nothing() {
        let store = Arc::new(MemoryRateStore::new());
        let limiter = RateLimiter::new(store.clone());

        limiter.check_limit("client-1", 1, 60_000).await.unwrap();
        let persisted = store.load("client-1").await.unwrap().unwrap();

        // Denied check must leave the persisted record untouched
        assert!(!limiter.check_limit("client-1", 1, 60_000).await.unwrap().allowed);
        assert_eq!(store.load("client-1").await.unwrap().unwrap(), persisted);
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = Arc::new(FileRateStore::new(dir.path()).unwrap());
            let limiter = RateLimiter::new(store);
            for _ in 0..2 {
                assert!(limiter.check_limit("client-1", 2, 60_000).await.unwrap().allowed);
            }
        }

        // New limiter over the same directory sees the exhausted window
        let store = Arc::new(FileRateStore::new(dir.path()).unwrap());
        let limiter = RateLimiter::new(store);
        let decision = limiter.check_limit("client-1", 2, 60_000).await.unwrap();
        assert!(!decision.allowed);
    }

    #[tokio::test]
    async fn test_concurrent_checks_never_exceed_limit() {
        let limiter = limiter();
        let mut handles = Vec::new();

        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                limiter.check_limit("shared", 5, 60_000).await.unwrap()
            }));
        }

        let decisions = futures::future::join_all(handles).await;
        let admitted = decisions
            .into_iter()
            .filter(|d| d.as_ref().unwrap().allowed)
            .count();
        assert_eq!(admitted, 5);
    }
}
