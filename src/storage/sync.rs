//! Loading with fallback and saving with forwarding
//!
//! Loading prefers the data source when online and mirrors what it returns
//! into the local snapshot. If the source is unreachable, malformed, or we are
//! offline, the last local snapshot is used instead. Saving always writes the
//! local snapshot first and then forwards to the source when online.

use crate::error::RosterError;
use crate::storage::local::{read_json, write_json, SnapshotStore, PLAYERS_KEY};
use crate::storage::source::PlayerSource;
use crate::types::Player;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Where a loaded player collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Remote,
    LocalSnapshot,
    Empty,
}

impl std::fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataOrigin::Remote => write!(f, "data source"),
            DataOrigin::LocalSnapshot => write!(f, "local snapshot"),
            DataOrigin::Empty => write!(f, "nothing (empty roster)"),
        }
    }
}

/// Result of a load attempt
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub players: Vec<Player>,
    pub origin: DataOrigin,
    /// Why the data source was not used, when it was tried and failed
    pub remote_failure: Option<RosterError>,
}

/// Result of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveReport {
    pub local_saved: bool,
    /// `None` when offline, otherwise whether forwarding succeeded
    pub remote_forwarded: Option<bool>,
}

fn as_load_failure(err: anyhow::Error) -> RosterError {
    match err.downcast::<RosterError>() {
        Ok(RosterError::LoadFailure { message }) => RosterError::LoadFailure { message },
        Ok(other) => RosterError::LoadFailure {
            message: other.to_string(),
        },
        Err(other) => RosterError::LoadFailure {
            message: other.to_string(),
        },
    }
}

/// Load the player collection. Never fails: the worst case is an empty roster.
pub async fn load_players(
    source: &dyn PlayerSource,
    local: &dyn SnapshotStore,
    online: bool,
) -> LoadOutcome {
    let mut remote_failure = None;

    if online {
        match source.fetch_players().await {
            Ok(players) => {
                if let Err(e) = write_json(local, PLAYERS_KEY, &players).await {
                    error!("Failed to mirror player data locally: {}", e);
                }
                info!(
                    source = %source.describe(),
                    players = players.len(),
                    "Loaded players from data source"
                );
                return LoadOutcome {
                    players,
                    origin: DataOrigin::Remote,
                    remote_failure: None,
                };
            }
            Err(e) => {
                let failure = as_load_failure(e);
                warn!(
                    source = %source.describe(),
                    "Falling back to local snapshot: {}", failure
                );
                remote_failure = Some(failure);
            }
        }
    }

    match read_json::<Vec<Player>>(local, PLAYERS_KEY).await {
        Ok(Some(players)) => {
            info!(players = players.len(), "Loaded players from local snapshot");
            LoadOutcome {
                players,
                origin: DataOrigin::LocalSnapshot,
                remote_failure,
            }
        }
        Ok(None) => {
            info!("No player data available, starting with an empty roster");
            LoadOutcome {
                players: Vec::new(),
                origin: DataOrigin::Empty,
                remote_failure,
            }
        }
        Err(e) => {
            warn!("Local snapshot unusable, starting with an empty roster: {}", e);
            LoadOutcome {
                players: Vec::new(),
                origin: DataOrigin::Empty,
                remote_failure,
            }
        }
    }
}

/// Save the player collection locally and forward it when online.
///
/// Failures are logged, not returned.
pub async fn save_players(
    players: &[Player],
    source: &dyn PlayerSource,
    local: &dyn SnapshotStore,
    online: bool,
) -> SaveReport {
    let local_saved = match write_json(local, PLAYERS_KEY, players).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save players locally: {}", e);
            false
        }
    };

    let remote_forwarded = if online {
        match source.push_players(players).await {
            Ok(()) => Some(true),
            Err(e) => {
                warn!(source = %source.describe(), "Failed to forward players: {}", e);
                Some(false)
            }
        }
    } else {
        None
    };

    SaveReport {
        local_saved,
        remote_forwarded,
    }
}
