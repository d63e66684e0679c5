//! The authoritative player roster
//!
//! The roster owns every player record together with their directional
//! interaction maps. Adding a player seeds neutral interactions in both
//! directions against everyone already present; removing a player strips their
//! id from every remaining interaction map.

use crate::error::{Result, RosterError};
use crate::rating::interaction::DEFAULT_INTERACTION;
use crate::rating::skill;
use crate::types::{Player, PlayerId, SortKey};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Number of partners shown on a player profile
pub const BEST_PARTNER_LIMIT: usize = 5;

/// Join name parts into a single display name.
///
/// Last and first names are required; an empty middle name is skipped.
pub fn compose_name(last: &str, first: &str, middle: Option<&str>) -> Result<String> {
    let (last, first) = (last.trim(), first.trim());
    if last.is_empty() || first.is_empty() {
        return Err(RosterError::invalid_input("last and first name are required").into());
    }

    let mut name = format!("{} {}", last, first);
    if let Some(middle) = middle.map(str::trim).filter(|m| !m.is_empty()) {
        name.push(' ');
        name.push_str(middle);
    }
    Ok(name)
}

/// Parse a skill typed by the organizer, rejecting anything outside the skill range
fn parse_skill_in_range(raw_skill: &str) -> Result<f64> {
    skill::parse_number(raw_skill)
        .filter(|value| skill::is_within_bounds(*value))
        .map(skill::clamp)
        .ok_or_else(|| {
            RosterError::invalid_input(format!(
                "skill must be a number between {} and {}, got '{}'",
                skill::MIN_SKILL,
                skill::MAX_SKILL,
                raw_skill.trim()
            ))
            .into()
        })
}

/// Partner entry on a player profile
#[derive(Debug, Clone, PartialEq)]
pub struct Partner<'a> {
    pub player: &'a Player,
    pub interaction: f64,
}

/// In-memory player roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from loaded records.
    ///
    /// Records are normalized, records without an id get the next free one and
    /// later duplicates of an id already seen are dropped.
    pub fn from_players(players: Vec<Player>) -> Self {
        let mut roster = Self::new();
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for mut player in players {
            if player.id == 0 {
                pending.push(player);
                continue;
            }
            if !seen.insert(player.id) {
                warn!(player_id = player.id, "Dropping duplicate player record");
                continue;
            }
            player.normalize();
            roster.players.push(player);
        }

        for mut player in pending {
            player.id = roster.next_id();
            player.normalize();
            debug!(player_id = player.id, name = %player.name, "Assigned id to player record");
            roster.players.push(player);
        }

        roster
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    /// Look up a player by id
    pub fn get(&self, player_id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .ok_or_else(|| RosterError::PlayerNotFound { player_id }.into())
    }

    /// Id the next added player will receive: one past the current maximum
    pub fn next_id(&self) -> PlayerId {
        self.players.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    /// Add a new player.
    ///
    /// The name must not be blank and the skill must be a number within the
    /// skill range; it is stored rounded to two decimals.
    pub fn add_player(&mut self, name: &str, raw_skill: &str) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::invalid_input("player name is required").into());
        }
        let new_skill = parse_skill_in_range(raw_skill)?;

        let mut player = Player::new(self.next_id(), name, new_skill);
        for existing in self.players.iter_mut() {
            player.set_interaction(existing.id, DEFAULT_INTERACTION);
            existing.set_interaction(player.id, DEFAULT_INTERACTION);
        }

        info!(player_id = player.id, name = %player.name, skill = player.skill, "Added player");
        self.players.push(player.clone());
        Ok(player)
    }

    /// Change a player's name and skill.
    ///
    /// An out-of-range skill is rejected rather than clamped. Nothing changes
    /// unless every check passes.
    pub fn edit_player(&mut self, player_id: PlayerId, name: &str, raw_skill: &str) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::invalid_input("player name is required").into());
        }
        let new_skill = parse_skill_in_range(raw_skill)?;

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(RosterError::PlayerNotFound { player_id })?;

        player.name = name.to_string();
        player.skill = new_skill;

        info!(player_id, name = %player.name, skill = player.skill, "Edited player");
        Ok(player.clone())
    }

    /// Remove a player and every interaction entry that points at them
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(RosterError::PlayerNotFound { player_id })?;

        let removed = self.players.remove(index);
        for player in self.players.iter_mut() {
            player.forget(player_id);
        }

        info!(player_id, name = %removed.name, "Removed player");
        Ok(removed)
    }

    /// Replace the stored record with the same id. Returns false if no such record exists.
    pub fn replace(&mut self, player: Player) -> bool {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(slot) => {
                *slot = player;
                true
            }
            None => {
                debug!(player_id = player.id, "Skipping write-back for unknown player");
                false
            }
        }
    }

    /// Players whose ids appear in `ids`, in roster order
    pub fn select(&self, ids: &[PlayerId]) -> Result<Vec<Player>> {
        if let Some(&missing) = ids.iter().find(|id| !self.contains(**id)) {
            return Err(RosterError::PlayerNotFound { player_id: missing }.into());
        }
        let wanted: HashSet<PlayerId> = ids.iter().copied().collect();
        Ok(self
            .players
            .iter()
            .filter(|p| wanted.contains(&p.id))
            .cloned()
            .collect())
    }

    /// Roster listing in the requested order
    pub fn sorted(&self, key: SortKey) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        match key {
            SortKey::Name => players.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            SortKey::Skill => players.sort_by(|a, b| by_skill_descending(a, b)),
        }
        players
    }

    /// Players the given player has an explicit interaction entry toward,
    /// strongest first, at most [`BEST_PARTNER_LIMIT`] of them
    pub fn best_partners(&self, player_id: PlayerId) -> Result<Vec<Partner<'_>>> {
        let player = self.get(player_id)?;

        let mut partners: Vec<Partner<'_>> = self
            .players
            .iter()
            .filter(|p| p.id != player_id && player.has_interaction_with(p.id))
            .map(|p| Partner {
                player: p,
                interaction: player.interaction_with(p.id),
            })
            .collect();

        partners.sort_by(|a, b| {
            b.interaction
                .partial_cmp(&a.interaction)
                .unwrap_or(Ordering::Equal)
        });
        partners.truncate(BEST_PARTNER_LIMIT);
        Ok(partners)
    }
}

/// Descending skill order; equal skills compare equal so stable sorts keep input order
pub fn by_skill_descending(a: &Player, b: &Player) -> Ordering {
    b.skill.partial_cmp(&a.skill).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err_kind(err: &anyhow::Error) -> RosterError {
        RosterError::from_anyhow(err).cloned().unwrap()
    }

    fn sample_roster() -> Roster {
        let mut roster = Roster::new();
        roster.add_player("Ivanov Ivan", "0.8").unwrap();
        roster.add_player("Petrov Petr", "0.6").unwrap();
        roster.add_player("Sidorov Sergey", "0.4").unwrap();
        roster
    }

    #[test]
    fn test_compose_name() {
        assert_eq!(
            compose_name("Ivanov", "Ivan", Some("Ivanovich")).unwrap(),
            "Ivanov Ivan Ivanovich"
        );
        assert_eq!(compose_name(" Ivanov ", "Ivan", None).unwrap(), "Ivanov Ivan");
        assert_eq!(compose_name("Ivanov", "Ivan", Some("  ")).unwrap(), "Ivanov Ivan");
    }

    #[test]
    fn test_compose_name_requires_last_and_first() {
        for (last, first) in [("", "Ivan"), ("Ivanov", "  "), ("", "")] {
            let err = compose_name(last, first, Some("Ivanovich")).unwrap_err();
            assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_add_assigns_sequential_ids_and_mirrored_interactions() {
        let roster = sample_roster();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.players()[0].id, 1);
        assert_eq!(roster.players()[2].id, 3);

        for a in roster.players() {
            for b in roster.players() {
                if a.id != b.id {
                    assert!(a.has_interaction_with(b.id));
                    assert_eq!(a.interaction_with(b.id), DEFAULT_INTERACTION);
                }
            }
            assert!(!a.has_interaction_with(a.id));
        }
    }

    #[test]
    fn test_add_rejects_out_of_range_skill() {
        let mut roster = Roster::new();
        for raw in ["1.5", "2.5", "0.05", "-1", "Infinity", "info"] {
            let err = roster.add_player("Strong", raw).unwrap_err();
            assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }), "{raw}");
        }
        assert!(roster.is_empty());

        let player = roster.add_player("Precise", "0.333").unwrap();
        assert_eq!(player.skill, 0.33);
        let player = roster.add_player("Edge", "1").unwrap();
        assert_eq!(player.skill, 1.0);
    }

    #[test]
    fn test_add_rejects_blank_name_and_non_numeric_skill() {
        let mut roster = Roster::new();

        let err = roster.add_player("   ", "0.5").unwrap_err();
        assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));

        let err = roster.add_player("Named", "strong").unwrap_err();
        assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));

        assert!(roster.is_empty());
    }

    #[test]
    fn test_next_id_continues_after_max() {
        let mut roster = sample_roster();
        roster.remove_player(2).unwrap();
        assert_eq!(roster.next_id(), 4);

        roster.remove_player(3).unwrap();
        assert_eq!(roster.next_id(), 2);

        roster.remove_player(1).unwrap();
        assert_eq!(roster.next_id(), 1);
    }

    #[test]
    fn test_edit_is_strict_about_range() {
        let mut roster = sample_roster();
        let before = roster.clone();

        let err = roster.edit_player(1, "Ivanov Ivan", "1.2").unwrap_err();
        assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));

        let err = roster.edit_player(1, "Ivanov Ivan", "0.05").unwrap_err();
        assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));

        let err = roster.edit_player(1, "", "0.5").unwrap_err();
        assert!(matches!(err_kind(&err), RosterError::InvalidInput { .. }));

        assert_eq!(roster, before);
    }

    #[test]
    fn test_edit_applies_name_and_rounded_skill() {
        let mut roster = sample_roster();

        let edited = roster.edit_player(2, "  Petrov Pavel ", "0.555").unwrap();
        assert_eq!(edited.name, "Petrov Pavel");
        assert_eq!(edited.skill, 0.56);
        assert_eq!(roster.get(2).unwrap().name, "Petrov Pavel");
    }

    #[test]
    fn test_edit_unknown_player() {
        let mut roster = sample_roster();
        let err = roster.edit_player(42, "Ghost", "0.5").unwrap_err();
        assert_eq!(err_kind(&err), RosterError::PlayerNotFound { player_id: 42 });
    }

    #[test]
    fn test_remove_cascades_interactions() {
        let mut roster = sample_roster();
        let removed = roster.remove_player(2).unwrap();
        assert_eq!(removed.id, 2);

        for player in roster.players() {
            assert!(!player.has_interaction_with(2));
        }

        let err = roster.get(2).unwrap_err();
        assert_eq!(err_kind(&err), RosterError::PlayerNotFound { player_id: 2 });

        let err = roster.remove_player(2).unwrap_err();
        assert_eq!(err_kind(&err), RosterError::PlayerNotFound { player_id: 2 });
    }

    #[test]
    fn test_add_then_delete_restores_roster() {
        let mut roster = sample_roster();
        let before = roster.clone();

        let added = roster.add_player("Temporary", "0.5").unwrap();
        roster.remove_player(added.id).unwrap();

        assert_eq!(roster, before);
    }

    #[test]
    fn test_from_players_assigns_missing_ids_and_drops_duplicates() {
        let mut first = Player::new(5, "Five", 0.5);
        first.interactions.insert(5, 0.9);
        let players = vec![
            first,
            Player::new(0, "Fresh", 0.5),
            Player::new(5, "Duplicate", 0.5),
        ];

        let roster = Roster::from_players(players);

        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(5).unwrap().name, "Five");
        assert!(!roster.get(5).unwrap().has_interaction_with(5));
        assert_eq!(roster.get(6).unwrap().name, "Fresh");
    }

    #[test]
    fn test_replace_only_existing_records() {
        let mut roster = sample_roster();
        let mut updated = roster.get(1).unwrap().clone();
        updated.match_wins = 3;

        assert!(roster.replace(updated));
        assert_eq!(roster.get(1).unwrap().match_wins, 3);
        assert!(!roster.replace(Player::new(99, "Ghost", 0.5)));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn test_select_keeps_roster_order() {
        let roster = sample_roster();
        let selected = roster.select(&[3, 1]).unwrap();
        assert_eq!(selected.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        let err = roster.select(&[1, 8]).unwrap_err();
        assert_eq!(err_kind(&err), RosterError::PlayerNotFound { player_id: 8 });
    }

    #[test]
    fn test_sorted_by_name_and_skill() {
        let mut roster = Roster::new();
        roster.add_player("charlie", "0.3").unwrap();
        roster.add_player("Alpha", "0.9").unwrap();
        roster.add_player("bravo", "0.6").unwrap();

        let by_name: Vec<&str> = roster
            .sorted(SortKey::Name)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(by_name, vec!["Alpha", "bravo", "charlie"]);

        let by_skill: Vec<f64> = roster.sorted(SortKey::Skill).iter().map(|p| p.skill).collect();
        assert_eq!(by_skill, vec![0.9, 0.6, 0.3]);
    }

    #[test]
    fn test_best_partners_ordering_and_limit() {
        let mut roster = Roster::new();
        for i in 0..8 {
            roster.add_player(&format!("Player {}", i), "0.5").unwrap();
        }
        let mut hub = roster.get(1).unwrap().clone();
        hub.set_interaction(4, 0.9);
        hub.set_interaction(6, 0.7);
        hub.forget(8);
        roster.replace(hub);

        let partners = roster.best_partners(1).unwrap();
        assert_eq!(partners.len(), BEST_PARTNER_LIMIT);
        assert_eq!(partners[0].player.id, 4);
        assert_eq!(partners[1].player.id, 6);
        assert!(partners.iter().all(|p| p.player.id != 8 && p.player.id != 1));

        assert!(roster.best_partners(77).is_err());
    }
}
