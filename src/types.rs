//! Common types used throughout the roster service

use crate::error::RosterError;
use crate::rating::interaction::DEFAULT_INTERACTION;
use crate::rating::skill;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Unique identifier for players
pub type PlayerId = u32;

/// Directional synergy scores from one player toward others
pub type Interactions = BTreeMap<PlayerId, f64>;

/// Name given to records that arrive without one
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown player";

/// A rostered player
///
/// Field names serialize in camelCase so the bundled `players.json` data file
/// and local snapshots share one format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Zero means "not yet assigned"; the roster hands out a fresh id on load
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: PlayerId,
    #[serde(default = "unknown_name", deserialize_with = "deserialize_name")]
    pub name: String,
    #[serde(
        default = "default_skill",
        deserialize_with = "deserialize_skill"
    )]
    pub skill: f64,
    #[serde(default, deserialize_with = "deserialize_interactions")]
    pub interactions: Interactions,
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub match_wins: u32,
    #[serde(default, deserialize_with = "deserialize_counter")]
    pub cup_wins: u32,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_captain: bool,
}

fn unknown_name() -> String {
    UNKNOWN_PLAYER_NAME.to_string()
}

fn default_skill() -> f64 {
    skill::DEFAULT_SKILL
}

/// Non-negative whole number from a JSON number or numeric string; fractions are truncated
fn lenient_count(raw: &serde_json::Value) -> Option<u32> {
    let number = match raw {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => skill::parse_number(s)?,
        _ => return None,
    };
    (number.is_finite() && number >= 0.0 && number <= f64::from(u32::MAX))
        .then(|| number.trunc() as u32)
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PlayerId, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_count(&raw).unwrap_or(0))
}

fn deserialize_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    let name = name.trim();
    Ok(if name.is_empty() {
        unknown_name()
    } else {
        name.to_string()
    })
}

fn deserialize_skill<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(skill::validate_value(&raw))
}

fn deserialize_interactions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Interactions, D::Error> {
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Object(entries) => entries,
        _ => return Ok(Interactions::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| {
            let id = key.trim().parse::<PlayerId>().ok()?;
            let score = match &value {
                serde_json::Value::Number(n) => n.as_f64()?,
                serde_json::Value::String(s) => skill::parse_number(s)?,
                _ => return None,
            };
            Some((id, skill::clamp(score)))
        })
        .collect())
}

fn deserialize_counter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(lenient_count(&raw).unwrap_or(0))
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw.as_bool().unwrap_or(false))
}

impl Player {
    /// Create a player with no history and no interaction entries
    pub fn new(id: PlayerId, name: impl Into<String>, skill: f64) -> Self {
        Self {
            id,
            name: name.into(),
            skill: skill::clamp(skill),
            interactions: Interactions::new(),
            match_wins: 0,
            cup_wins: 0,
            is_captain: false,
        }
    }

    /// Interaction toward `other`, falling back to the neutral default for unseen pairs
    pub fn interaction_with(&self, other: PlayerId) -> f64 {
        self.interactions
            .get(&other)
            .copied()
            .unwrap_or(DEFAULT_INTERACTION)
    }

    /// Whether an explicit entry exists toward `other`
    pub fn has_interaction_with(&self, other: PlayerId) -> bool {
        self.interactions.contains_key(&other)
    }

    /// Store an interaction toward `other`; self references are ignored
    pub fn set_interaction(&mut self, other: PlayerId, value: f64) {
        if other != self.id {
            self.interactions.insert(other, skill::clamp(value));
        }
    }

    /// Drop the entry toward `other`, if any
    pub fn forget(&mut self, other: PlayerId) {
        self.interactions.remove(&other);
    }

    /// Bring a freshly loaded record in line with the roster invariants
    pub fn normalize(&mut self) {
        self.skill = skill::clamp(self.skill);
        self.interactions.remove(&self.id);
    }

    /// Copy of this player suitable for placing on a team
    pub fn snapshot(&self, is_captain: bool) -> Self {
        Self {
            is_captain,
            ..self.clone()
        }
    }
}

/// Ordered sequence of player snapshots forming one team of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn new() -> Self {
        Self::default()
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

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn captain(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_captain)
    }

    /// Mean skill of the team, 0 for an empty team
    pub fn average_skill(&self) -> f64 {
        if self.players.is_empty() {
            return 0.0;
        }
        self.players.iter().map(|p| p.skill).sum::<f64>() / self.players.len() as f64
    }

    /// Remove a player from the team, returning the snapshot that was held
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == player_id)?;
        Some(self.players.remove(index))
    }
}

/// Outcome of a match or cup for one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        matches!(self, Outcome::Win)
    }

    /// Human label for an optional outcome
    pub fn label(outcome: Option<Outcome>) -> &'static str {
        match outcome {
            Some(Outcome::Win) => "win",
            Some(Outcome::Loss) => "loss",
            None => "not played",
        }
    }
}

impl From<bool> for Outcome {
    fn from(won: bool) -> Self {
        if won {
            Outcome::Win
        } else {
            Outcome::Loss
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

impl FromStr for Outcome {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" | "won" | "w" => Ok(Outcome::Win),
            "loss" | "lose" | "lost" | "l" => Ok(Outcome::Loss),
            other => Err(RosterError::invalid_input(format!(
                "unknown outcome '{}', expected win or loss",
                other
            ))),
        }
    }
}

/// How the teams of a session were put together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormationMode {
    Manual,
    Auto,
}

impl std::fmt::Display for FormationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormationMode::Manual => write!(f, "manual"),
            FormationMode::Auto => write!(f, "auto"),
        }
    }
}

/// Ordering for roster listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Skill,
}

impl FromStr for SortKey {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "skill" => Ok(SortKey::Skill),
            other => Err(RosterError::invalid_input(format!(
                "unknown sort key '{}', expected name or skill",
                other
            ))),
        }
    }
}
