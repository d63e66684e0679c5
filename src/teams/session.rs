//! Team formation sessions
//!
//! A session holds the teams of one formation, either dealt by the balancer or
//! built by hand. Teams hold player snapshots, not references into the roster;
//! the whole session is discarded when teams are reset or formed again.

use crate::error::{Result, RosterError};
use crate::types::{FormationMode, Player, PlayerId, Team};
use crate::utils::{current_timestamp, generate_session_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier for formation sessions
pub type SessionId = Uuid;

/// Teams of one formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSession {
    pub id: SessionId,
    pub mode: FormationMode,
    pub created_at: DateTime<Utc>,
    pub teams: Vec<Team>,
}

impl TeamSession {
    /// Start a manual formation with `team_count` empty teams
    pub fn manual(team_count: usize) -> Self {
        Self::with_teams(FormationMode::Manual, vec![Team::new(); team_count])
    }

    /// Wrap teams produced by a balancer
    pub fn auto(teams: Vec<Team>) -> Self {
        Self::with_teams(FormationMode::Auto, teams)
    }

    fn with_teams(mode: FormationMode, teams: Vec<Team>) -> Self {
        Self {
            id: generate_session_id(),
            mode,
            created_at: current_timestamp(),
            teams,
        }
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team(&self, team_index: usize) -> Result<&Team> {
        self.teams
            .get(team_index)
            .ok_or_else(|| RosterError::TeamNotFound { team_index }.into())
    }

    pub fn team_mut(&mut self, team_index: usize) -> Result<&mut Team> {
        self.teams
            .get_mut(team_index)
            .ok_or_else(|| RosterError::TeamNotFound { team_index }.into())
    }

    /// Index of the team currently holding the player
    pub fn team_of(&self, player_id: PlayerId) -> Option<usize> {
        self.teams.iter().position(|t| t.contains(player_id))
    }

    /// Ids of every player placed on some team
    pub fn assigned_ids(&self) -> HashSet<PlayerId> {
        self.teams
            .iter()
            .flat_map(|t| t.players.iter().map(|p| p.id))
            .collect()
    }

    /// Place a copy of `player` on the given team.
    ///
    /// The player leaves whichever other team held them. Placing a player on
    /// the team they are already on changes nothing. The first player placed
    /// on an empty team becomes its captain.
    pub fn place_player(&mut self, player: &Player, team_index: usize) -> Result<()> {
        if team_index >= self.teams.len() {
            return Err(RosterError::TeamNotFound { team_index }.into());
        }

        for (index, team) in self.teams.iter_mut().enumerate() {
            if index != team_index && team.remove_player(player.id).is_some() {
                debug!(player_id = player.id, from_team = index, "Moved player off team");
            }
        }

        let team = &mut self.teams[team_index];
        if !team.contains(player.id) {
            let is_captain = team.is_empty();
            team.players.push(player.snapshot(is_captain));
            debug!(player_id = player.id, team_index, is_captain, "Placed player on team");
        }
        Ok(())
    }

    /// Remove a deleted player from every team and from every snapshot's
    /// interaction map. Returns whether the player was on a team.
    pub fn remove_player(&mut self, player_id: PlayerId) -> bool {
        let mut removed = false;
        for team in self.teams.iter_mut() {
            removed |= team.remove_player(player_id).is_some();
            for snapshot in team.players.iter_mut() {
                snapshot.forget(player_id);
            }
        }
        removed
    }
}
