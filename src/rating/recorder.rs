//! Match and cup result recording
//!
//! Recording a result for a team adjusts every member independently:
//! a match outcome moves skill by one `skill_step` and every directional
//! interaction toward a teammate by one `interaction_step` (up on a win, down on
//! a loss), and counts a match win; a cup outcome only counts a cup win.

use crate::rating::skill;
use crate::types::{Outcome, Player, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Step sizes applied by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Skill change per recorded match
    pub skill_step: f64,
    /// Interaction change per recorded match, per teammate
    pub interaction_step: f64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            skill_step: 0.01,
            interaction_step: 0.05,
        }
    }
}

/// Per-player summary of what a recorded result changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub player_id: PlayerId,
    pub old_skill: f64,
    pub new_skill: f64,
    pub match_wins: u32,
    pub cup_wins: u32,
}

impl PlayerUpdate {
    pub fn skill_delta(&self) -> f64 {
        skill::round2(self.new_skill - self.old_skill)
    }
}

/// Everything a single recorded result produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedResult {
    pub match_outcome: Option<Outcome>,
    pub cup_outcome: Option<Outcome>,
    /// Updated player snapshots, in team order
    pub players: Vec<Player>,
    pub updates: Vec<PlayerUpdate>,
}

impl RecordedResult {
    /// One-line description such as "match: win, cup: not played"
    pub fn summary(&self) -> String {
        format!(
            "match: {}, cup: {}",
            Outcome::label(self.match_outcome),
            Outcome::label(self.cup_outcome)
        )
    }
}

/// Applies match and cup outcomes to a team
#[derive(Debug, Clone, Default)]
pub struct MatchRecorder {
    config: RecorderConfig,
}

impl MatchRecorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Apply the outcomes to every player of `team` in place.
    ///
    /// Both outcomes are optional and independent; passing neither leaves the
    /// team untouched.
    pub fn record(
        &self,
        team: &mut [Player],
        match_outcome: Option<Outcome>,
        cup_outcome: Option<Outcome>,
    ) -> RecordedResult {
        let member_ids: Vec<PlayerId> = team.iter().map(|p| p.id).collect();
        let mut updates = Vec::with_capacity(team.len());

        for player in team.iter_mut() {
            let old_skill = player.skill;

            if let Some(outcome) = match_outcome {
                self.apply_match(player, &member_ids, outcome);
            }

            if let Some(Outcome::Win) = cup_outcome {
                player.cup_wins += 1;
            }

            debug!(
                player_id = player.id,
                old_skill,
                new_skill = player.skill,
                "Recorded result for player"
            );

            updates.push(PlayerUpdate {
                player_id: player.id,
                old_skill,
                new_skill: player.skill,
                match_wins: player.match_wins,
                cup_wins: player.cup_wins,
            });
        }

        RecordedResult {
            match_outcome,
            cup_outcome,
            players: team.to_vec(),
            updates,
        }
    }

    fn apply_match(&self, player: &mut Player, member_ids: &[PlayerId], outcome: Outcome) {
        let direction = if outcome.is_win() { 1.0 } else { -1.0 };

        player.skill = skill::clamp(player.skill + direction * self.config.skill_step);

        let self_id = player.id;
        for &teammate in member_ids.iter().filter(|&&id| id != self_id) {
            let current = player.interaction_with(teammate);
            player.set_interaction(teammate, current + direction * self.config.interaction_step);
        }

        if outcome.is_win() {
            player.match_wins += 1;
        }
    }
}
