//! Team interaction scoring
//!
//! Interactions are directional: A's score toward B can differ from B's score
//! toward A. Unseen pairs count as [`DEFAULT_INTERACTION`].

use crate::types::Player;

/// Interaction assumed for any pair without an explicit entry
pub const DEFAULT_INTERACTION: f64 = 0.5;

/// Mean of both directional interactions of a pair
pub fn pair_interaction(a: &Player, b: &Player) -> f64 {
    (a.interaction_with(b.id) + b.interaction_with(a.id)) / 2.0
}

/// Average directional interaction over every unordered pair of the team.
///
/// Returns 0 when the team has fewer than two players.
pub fn team_interaction(players: &[Player]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;

    for (i, first) in players.iter().enumerate() {
        for second in &players[i + 1..] {
            total += first.interaction_with(second.id) + second.interaction_with(first.id);
            count += 2;
        }
    }

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
