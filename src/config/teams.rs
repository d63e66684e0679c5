//! Team formation configuration

use crate::teams::balancer::BalancerConfig;
use serde::{Deserialize, Serialize};

/// Limits applied when forming teams
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    pub min_team_count: usize,
    pub max_team_count: usize,
    /// Selected players required per team for automatic formation
    pub min_players_per_team: usize,
    /// Roster size needed before automatic formation is offered
    pub min_roster_for_auto: usize,
    /// Roster size needed before manual formation is offered
    pub min_roster_for_manual: usize,
}

impl Default for TeamConfig {
    fn default() -> Self {
        let balancer = BalancerConfig::default();
        Self {
            min_team_count: balancer.min_team_count,
            max_team_count: balancer.max_team_count,
            min_players_per_team: balancer.min_players_per_team,
            min_roster_for_auto: 4,
            min_roster_for_manual: 2,
        }
    }
}

impl From<&TeamConfig> for BalancerConfig {
    fn from(config: &TeamConfig) -> Self {
        Self {
            min_team_count: config.min_team_count,
            max_team_count: config.max_team_count,
            min_players_per_team: config.min_players_per_team,
        }
    }
}
