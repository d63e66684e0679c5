//! Local snapshot persistence
//!
//! A small key-value interface the service writes to after every mutation and
//! reads from when the player data source cannot be reached.

use crate::error::{Result, RosterError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Key under which the player collection is stored
pub const PLAYERS_KEY: &str = "players";

/// Key under which the current formation session is stored
pub const SESSION_KEY: &str = "teams";

/// Trait for local key-value snapshot storage
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, if any
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing what was there
    async fn write(&self, key: &str, value: String) -> Result<()>;

    /// Remove the value under `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value from the store
pub async fn read_json<T: DeserializeOwned>(store: &dyn SnapshotStore, key: &str) -> Result<Option<T>> {
    match store.read(key).await? {
        Some(raw) => {
            let value = serde_json::from_str(&raw).map_err(|e| RosterError::LoadFailure {
                message: format!("Malformed local snapshot under '{}': {}", key, e),
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encode a value as JSON and write it to the store
pub async fn write_json<T: Serialize + ?Sized>(store: &dyn SnapshotStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| RosterError::PersistenceFailed {
        message: format!("Failed to encode '{}': {}", key, e),
    })?;
    store.write(key, raw).await
}

/// Snapshot store keeping one JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RosterError::LoadFailure {
                message: format!("Failed to read {}: {}", path.display(), e),
            }
            .into()),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key);
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| RosterError::PersistenceFailed {
                message: format!("Failed to create {}: {}", self.dir.display(), e),
            })?;
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| RosterError::PersistenceFailed {
                message: format!("Failed to write {}: {}", path.display(), e),
            })?;

        debug!(path = %path.display(), "Wrote local snapshot");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RosterError::PersistenceFailed {
                message: format!("Failed to remove {}: {}", path.display(), e),
            }
            .into()),
        }
    }
}

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RosterError::PersistenceFailed {
                message: "Failed to acquire snapshot read lock".to_string(),
            })?;

        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RosterError::PersistenceFailed {
                message: "Failed to acquire snapshot write lock".to_string(),
            })?;

        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| RosterError::PersistenceFailed {
                message: "Failed to acquire snapshot write lock".to_string(),
            })?;

        entries.remove(key);
        Ok(())
    }
}
