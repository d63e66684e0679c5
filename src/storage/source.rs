//! Player data sources
//!
//! The data source is the collaborator that provides the bulk player
//! collection at startup and accepts the current collection back when there is
//! connectivity. Records use the `{"players": [...]}` document format.

use crate::error::{Result, RosterError};
use crate::types::Player;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// Bulk player document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerDocument {
    #[serde(default)]
    pub players: Vec<Player>,
}

/// Trait for player data sources
#[async_trait]
pub trait PlayerSource: Send + Sync {
    /// Fetch the full player collection
    async fn fetch_players(&self) -> Result<Vec<Player>>;

    /// Send the full player collection back to the source
    async fn push_players(&self, players: &[Player]) -> Result<()>;

    /// Short description for logs and status output
    fn describe(&self) -> String;
}

/// Player source backed by a JSON data file
#[derive(Debug, Clone)]
pub struct FilePlayerSource {
    path: PathBuf,
}

impl FilePlayerSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PlayerSource for FilePlayerSource {
    async fn fetch_players(&self) -> Result<Vec<Player>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| RosterError::LoadFailure {
                message: format!("Failed to read {}: {}", self.path.display(), e),
            })?;

        let document: PlayerDocument =
            serde_json::from_str(&raw).map_err(|e| RosterError::LoadFailure {
                message: format!("Malformed player data in {}: {}", self.path.display(), e),
            })?;

        debug!(
            path = %self.path.display(),
            players = document.players.len(),
            "Fetched player data"
        );
        Ok(document.players)
    }

    async fn push_players(&self, players: &[Player]) -> Result<()> {
        let document = PlayerDocument {
            players: players.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&document).map_err(|e| {
            RosterError::PersistenceFailed {
                message: format!("Failed to encode player data: {}", e),
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RosterError::PersistenceFailed {
                    message: format!("Failed to create {}: {}", parent.display(), e),
                })?;
        }
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| RosterError::PersistenceFailed {
                message: format!("Failed to write {}: {}", self.path.display(), e),
            })?;

        debug!(path = %self.path.display(), players = players.len(), "Pushed player data");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Player source holding its collection in memory
#[derive(Debug, Default)]
pub struct StaticPlayerSource {
    players: RwLock<Vec<Player>>,
}

impl StaticPlayerSource {
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players),
        }
    }

    /// Current collection held by the source
    pub fn players(&self) -> Vec<Player> {
        self.players
            .read()
            .map(|players| players.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlayerSource for StaticPlayerSource {
    async fn fetch_players(&self) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| RosterError::LoadFailure {
                message: "Failed to acquire player source read lock".to_string(),
            })?;

        Ok(players.clone())
    }

    async fn push_players(&self, players: &[Player]) -> Result<()> {
        let mut stored = self
            .players
            .write()
            .map_err(|_| RosterError::PersistenceFailed {
                message: "Failed to acquire player source write lock".to_string(),
            })?;

        *stored = players.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
