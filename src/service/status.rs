//! Status reporting
//!
//! A snapshot of where the roster came from, whether changes reach the data
//! source, and what the current formation looks like.

use crate::service::app::RosterService;
use crate::storage::sync::DataOrigin;
use crate::types::FormationMode;
use serde::{Deserialize, Serialize};

/// Connectivity as seen by the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Online,
    Offline,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Online => write!(f, "online"),
            ConnectionStatus::Offline => write!(f, "offline, data may be out of date"),
        }
    }
}

/// Status report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Service name
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub connection: ConnectionStatus,
    /// Where the roster was loaded from at startup
    pub loaded_from: DataOrigin,
    pub data_source: String,
    pub players: usize,
    pub formation: Option<FormationMode>,
    pub teams: usize,
    pub players_on_teams: usize,
}

impl StatusReport {
    pub fn gather(service: &RosterService, data_source: String) -> Self {
        let session = service.session();

        Self {
            service: service.config().service.name.clone(),
            version: crate::VERSION.to_string(),
            timestamp: chrono::Utc::now(),
            connection: if service.is_online() {
                ConnectionStatus::Online
            } else {
                ConnectionStatus::Offline
            },
            loaded_from: service.origin(),
            data_source,
            players: service.roster().len(),
            formation: session.map(|s| s.mode),
            teams: session.map_or(0, |s| s.team_count()),
            players_on_teams: session.map_or(0, |s| s.assigned_ids().len()),
        }
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} {}", self.service, self.version)?;
        writeln!(f, "  Connection: {}", self.connection)?;
        writeln!(f, "  Data source: {}", self.data_source)?;
        writeln!(f, "  Loaded from: {}", self.loaded_from)?;
        writeln!(f, "  Players: {}", self.players)?;
        match self.formation {
            Some(mode) => writeln!(
                f,
                "  Teams: {} ({} formation, {} players placed)",
                self.teams, mode, self.players_on_teams
            ),
            None => writeln!(f, "  Teams: none formed"),
        }
    }
}
