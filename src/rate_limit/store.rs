//! Rate State Store
//!
//! Durable storage for per-identity window state: one named record per
//! identity holding exactly `{count, window_start}`, wrapped in a versioned
//! JSON envelope. In-memory and file-backed implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::crypto::sha256_hex;
use crate::store::StoreError;

use super::window::WindowState;

/// Current durable record version
const RECORD_VERSION: u32 = 1;

/// Versioned on-disk envelope for a window record
#[derive(Debug, Serialize, Deserialize)]
struct StateRecord {
    version: u32,
    count: u32,
    window_start: i64,
}

/// Persistence contract for the rate admission actor.
#[async_trait]
pub trait RateStateStore: Send + Sync {
    /// Load the window state for `identity`, if one was ever persisted.
    async fn load(&self, identity: &str) -> Result<Option<WindowState>, StoreError>;

    /// Persist the window state for `identity`.
    async fn save(&self, identity: &str, state: WindowState) -> Result<(), StoreError>;
}

/// In-memory rate state store for tests and single-process runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateStore {
    records: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl MemoryRateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStateStore for MemoryRateStore {
    async fn load(&self, identity: &str) -> Result<Option<WindowState>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(identity).copied())
    }

    async fn save(&self, identity: &str, state: WindowState) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(identity.to_string(), state);
        Ok(())
    }
}

/// File-backed rate state store: one JSON file per identity.
///
/// Identities are hashed into filenames so arbitrary identity strings stay
/// filesystem-safe. Writes go through a temp file and rename.
#[derive(Debug, Clone)]
pub struct FileRateStore {
    dir: PathBuf,
}

impl FileRateStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn record_path(&self, identity: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sha256_hex(identity)))
    }
}

#[async_trait]
impl RateStateStore for FileRateStore {
    async fn load(&self, identity: &str) -> Result<Option<WindowState>, StoreError> {
        let path = self.record_path(identity);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: StateRecord = serde_json::from_str(&contents)?;
        if record.version != RECORD_VERSION {
            return Err(StoreError::Serialization(format!(
                "unsupported rate record version: {}",
                record.version
            )));
        }

        Ok(Some(WindowState {
            count: record.count,
            window_start: record.window_start,
        }))
    }

    async fn save(&self, identity: &str, state: WindowState) -> Result<(), StoreError> {
        let record = StateRecord {
            version: RECORD_VERSION,
            count: state.count,
            window_start: state.window_start,
        };
        let path = self.record_path(identity);
        let tmp = path.with_extension("json.tmp");

        std::fs::write(&tmp, serde_json::to_vec(&record)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryRateStore::new();
        assert!(store.load("client-1").await.unwrap().is_none());

        let state = WindowState {
            count: 3,
            window_start: 42_000,
        };
        store.save("client-1", state).await.unwrap();
        assert_eq!(store.load("client-1").await.unwrap(), Some(state));
        assert!(store.load("client-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path()).unwrap();

        let state = WindowState {
            count: 7,
            window_start: 99_000,
        };
        store.save("client-1", state).await.unwrap();
        assert_eq!(store.load("client-1").await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_file_store_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path()).unwrap();
        assert!(store.load("never-seen").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_survives_reconstruction() {
        let dir = tempfile::tempdir().unwrap();
        let state = WindowState {
            count: 2,
            window_start: 1_234,
        };

        {
            let store = FileRateStore::new(dir.path()).unwrap();
            store.save("client-1", state).await.unwrap();
        }

        let store = FileRateStore::new(dir.path()).unwrap();
        assert_eq!(store.load("client-1").await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_file_store_handles_awkward_identities() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path()).unwrap();
        let identity = "ip:2001:db8::1/../../etc";

        let state = WindowState {
            count: 1,
            window_start: 0,
        };
        store.save(identity, state).await.unwrap();
        assert_eq!(store.load(identity).await.unwrap(), Some(state));
    }

    #[tokio::test]
    async fn test_file_store_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRateStore::new(dir.path()).unwrap();

        let path = dir.path().join(format!("{}.json", sha256_hex("client-1")));
        std::fs::write(&path, r#"{"version":9,"count":1,"window_start":0}"#).unwrap();

        assert!(matches!(
            store.load("client-1").await,
            Err(StoreError::Serialization(_))
        ));
    }
}
