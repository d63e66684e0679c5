//! Automatic team balancing
//!
//! This module splits a set of players into skill-balanced teams using a
//! snake draft over the players sorted by skill.

use crate::error::{Result, RosterError};
use crate::rating::roster::by_skill_descending;
use crate::types::{Player, Team};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Limits enforced before any balancing takes place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancerConfig {
    /// Fewest teams a formation may have
    pub min_team_count: usize,
    /// Most teams a formation may have
    pub max_team_count: usize,
    /// Players required per requested team
    pub min_players_per_team: usize,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            min_team_count: 2,
            max_team_count: 10,
            min_players_per_team: 2,
        }
    }
}

impl BalancerConfig {
    /// Reject team counts outside the configured range
    pub fn check_team_count(&self, team_count: usize) -> Result<()> {
        if team_count < self.min_team_count || team_count > self.max_team_count {
            return Err(RosterError::invalid_input(format!(
                "team count must be between {} and {}, got {}",
                self.min_team_count, self.max_team_count, team_count
            ))
            .into());
        }
        Ok(())
    }

    /// Reject formations with fewer than `min_players_per_team` players per team
    pub fn check_player_count(&self, team_count: usize, available: usize) -> Result<()> {
        let required = team_count * self.min_players_per_team;
        if available < required {
            return Err(RosterError::InsufficientPlayers {
                required,
                available,
            }
            .into());
        }
        Ok(())
    }
}

/// Trait for team balancing algorithms
pub trait TeamBalancer: Send + Sync {
    /// Partition `players` into `team_count` teams.
    ///
    /// Every input player ends up in exactly one team, as a snapshot copy.
    fn balance(&self, players: &[Player], team_count: usize) -> Result<Vec<Team>>;
}

/// Team index for the `position`-th pick of a snake draft over `team_count` teams.
///
/// The sequence runs `0, 1, .., n-1, n-1, .., 1, 0, 0, 1, ..`.
pub fn snake_slot(position: usize, team_count: usize) -> usize {
    let round = position / team_count;
    let offset = position % team_count;
    if round % 2 == 0 {
        offset
    } else {
        team_count - 1 - offset
    }
}

/// Snake-draft balancer
///
/// Players are sorted by descending skill (ties keep their input order) and
/// dealt to teams in snake order. The first pick of each team, which is the
/// strongest player it receives, becomes its captain.
#[derive(Debug, Clone, Default)]
pub struct SnakeDraftBalancer {
    config: BalancerConfig,
}

impl SnakeDraftBalancer {
    pub fn new(config: BalancerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }
}

impl TeamBalancer for SnakeDraftBalancer {
    fn balance(&self, players: &[Player], team_count: usize) -> Result<Vec<Team>> {
        self.config.check_team_count(team_count)?;
        self.config.check_player_count(team_count, players.len())?;

        let mut sorted: Vec<&Player> = players.iter().collect();
        sorted.sort_by(|a, b| by_skill_descending(a, b));

        let mut teams = vec![Team::new(); team_count];
        for (position, player) in sorted.into_iter().enumerate() {
            let slot = snake_slot(position, team_count);
            teams[slot].players.push(player.snapshot(position < team_count));
        }

        debug!(
            team_count,
            players = players.len(),
            "Balanced teams with snake draft"
        );
        Ok(teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players_with_skills(skills: &[f64]) -> Vec<Player> {
        skills
            .iter()
            .enumerate()
            .map(|(i, &s)| Player::new(i as u32 + 1, format!("Player {}", i + 1), s))
            .collect()
    }

    fn skills(team: &Team) -> Vec<f64> {
        team.players.iter().map(|p| p.skill).collect()
    }

    #[test]
    fn test_snake_slot_sequence() {
        let order: Vec<usize> = (0..9).map(|i| snake_slot(i, 3)).collect();
        assert_eq!(order, vec![0, 1, 2, 2, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn test_four_players_two_teams() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.7, 0.9, 0.6, 0.8]);

        let teams = balancer.balance(&players, 2).unwrap();

        assert_eq!(skills(&teams[0]), vec![0.9, 0.6]);
        assert_eq!(skills(&teams[1]), vec![0.8, 0.7]);
    }

    #[test]
    fn test_captains_are_first_picks() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.3, 0.5, 0.9, 0.8, 0.7, 0.4]);

        let teams = balancer.balance(&players, 3).unwrap();

        for team in &teams {
            let captains: Vec<&Player> = team.players.iter().filter(|p| p.is_captain).collect();
            assert_eq!(captains.len(), 1);
            assert_eq!(captains[0].id, team.players[0].id);
            assert!(team.players.iter().all(|p| p.skill <= captains[0].skill));
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.5, 0.5, 0.5, 0.5]);

        let teams = balancer.balance(&players, 2).unwrap();

        assert_eq!(teams[0].player_ids(), vec![1, 4]);
        assert_eq!(teams[1].player_ids(), vec![2, 3]);
    }

    #[test]
    fn test_uneven_player_count() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.9, 0.8, 0.7, 0.6, 0.5]);

        let teams = balancer.balance(&players, 2).unwrap();

        assert_eq!(teams[0].len() + teams[1].len(), 5);
        assert_eq!(skills(&teams[0]), vec![0.9, 0.6, 0.5]);
        assert_eq!(skills(&teams[1]), vec![0.8, 0.7]);
    }

    #[test]
    fn test_input_captain_flags_are_reset() {
        let balancer = SnakeDraftBalancer::default();
        let mut players = players_with_skills(&[0.9, 0.8, 0.7, 0.6]);
        players[3].is_captain = true;

        let teams = balancer.balance(&players, 2).unwrap();
        let captains = teams
            .iter()
            .flat_map(|t| t.players.iter())
            .filter(|p| p.is_captain)
            .count();
        assert_eq!(captains, 2);
    }

    #[test]
    fn test_rejects_bad_team_count() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.5; 30]);

        for count in [0, 1, 11] {
            let err = balancer.balance(&players, count).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RosterError>(),
                Some(RosterError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_insufficient_players() {
        let balancer = SnakeDraftBalancer::default();
        let players = players_with_skills(&[0.5, 0.6, 0.7, 0.8, 0.9]);

        let err = balancer.balance(&players, 3).unwrap_err();
        assert_eq!(
            err.downcast_ref::<RosterError>(),
            Some(&RosterError::InsufficientPlayers {
                required: 6,
                available: 5
            })
        );
    }
}
