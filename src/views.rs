//! Display fields handed to the rendering side
//!
//! Views are plain serializable snapshots with scores already formatted, so a
//! renderer never needs to reach back into the roster.

use crate::rating::interaction::team_interaction;
use crate::rating::recorder::RecordedResult;
use crate::rating::roster::Partner;
use crate::teams::session::TeamSession;
use crate::types::{FormationMode, Outcome, Player, PlayerId, Team};
use crate::utils::format_score;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub skill: String,
    pub match_wins: u32,
    pub cup_wins: u32,
    pub is_captain: bool,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            skill: format_score(player.skill),
            match_wins: player.match_wins,
            cup_wins: player.cup_wins,
            is_captain: player.is_captain,
        }
    }
}

impl fmt::Display for PlayerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} {:<32} skill {}  matches won {}  cups won {}",
            self.id, self.name, self.skill, self.match_wins, self.cup_wins
        )?;
        if self.is_captain {
            write!(f, "  (captain)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamView {
    /// 1-based team number as shown to the organizer
    pub number: usize,
    pub players: Vec<PlayerView>,
    pub captain: Option<String>,
    pub average_skill: String,
    pub interaction: String,
}

impl TeamView {
    pub fn new(index: usize, team: &Team) -> Self {
        Self {
            number: index + 1,
            players: team.players.iter().map(PlayerView::from).collect(),
            captain: team.captain().map(|p| p.name.clone()),
            average_skill: format_score(team.average_skill()),
            interaction: format_score(team_interaction(&team.players)),
        }
    }
}

impl fmt::Display for TeamView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Team {} ({} players, average skill {}, interaction {})",
            self.number,
            self.players.len(),
            self.average_skill,
            self.interaction
        )?;
        if self.players.is_empty() {
            writeln!(f, "  (empty)")?;
        }
        for player in &self.players {
            writeln!(f, "  {}", player)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub mode: FormationMode,
    pub created_at: DateTime<Utc>,
    pub teams: Vec<TeamView>,
}

impl From<&TeamSession> for SessionView {
    fn from(session: &TeamSession) -> Self {
        Self {
            id: session.id,
            mode: session.mode,
            created_at: session.created_at,
            teams: session
                .teams
                .iter()
                .enumerate()
                .map(|(i, t)| TeamView::new(i, t))
                .collect(),
        }
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} formation started {}",
            self.mode,
            self.created_at.format("%Y-%m-%d %H:%M")
        )?;
        for team in &self.teams {
            write!(f, "{}", team)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerView {
    pub id: PlayerId,
    pub name: String,
    pub interaction: String,
    pub skill: String,
    pub match_wins: u32,
    pub cup_wins: u32,
}

impl From<&Partner<'_>> for PartnerView {
    fn from(partner: &Partner<'_>) -> Self {
        Self {
            id: partner.player.id,
            name: partner.player.name.clone(),
            interaction: format_score(partner.interaction),
            skill: format_score(partner.player.skill),
            match_wins: partner.player.match_wins,
            cup_wins: partner.player.cup_wins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub player: PlayerView,
    pub best_partners: Vec<PartnerView>,
}

impl fmt::Display for ProfileView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.player)?;
        if self.best_partners.is_empty() {
            return writeln!(f, "No interaction data with other players");
        }
        writeln!(f, "Best partners:")?;
        for partner in &self.best_partners {
            writeln!(
                f,
                "  {:<32} interaction {}  skill {}  matches {}  cups {}",
                partner.name, partner.interaction, partner.skill, partner.match_wins, partner.cup_wins
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub team: usize,
    pub match_result: String,
    pub cup_result: String,
    pub players: Vec<PlayerView>,
}

impl ResultView {
    pub fn new(team_index: usize, result: &RecordedResult) -> Self {
        Self {
            team: team_index + 1,
            match_result: Outcome::label(result.match_outcome).to_string(),
            cup_result: Outcome::label(result.cup_outcome).to_string(),
            players: result.players.iter().map(PlayerView::from).collect(),
        }
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Results saved for team {}: match {}, cup {}",
            self.team, self.match_result, self.cup_result
        )?;
        for player in &self.players {
            writeln!(f, "  {}", player)?;
        }
        Ok(())
    }
}
