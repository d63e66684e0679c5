//! Roster service coordination
//!
//! This module contains the `RosterService`, the single object that owns the
//! roster and the current formation session and exposes every organizer
//! command. Each command validates first, mutates in memory, then persists.

use crate::config::AppConfig;
use crate::error::{Result, RosterError};
use crate::rating::recorder::{MatchRecorder, RecordedResult, RecorderConfig};
use crate::rating::roster::Roster;
use crate::rating::interaction::team_interaction;
use crate::service::status::StatusReport;
use crate::storage::local::{read_json, write_json, SnapshotStore, SESSION_KEY};
use crate::storage::source::PlayerSource;
use crate::storage::sync::{load_players, save_players, DataOrigin, SaveReport};
use crate::teams::balancer::{BalancerConfig, SnakeDraftBalancer, TeamBalancer};
use crate::teams::session::TeamSession;
use crate::types::{Outcome, Player, PlayerId, SortKey};
use crate::views::{PartnerView, PlayerView, ProfileView};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Owner of the roster, the formation session and the persistence collaborators
pub struct RosterService {
    config: AppConfig,
    roster: Roster,
    session: Option<TeamSession>,
    balancer: Arc<dyn TeamBalancer>,
    recorder: MatchRecorder,
    source: Arc<dyn PlayerSource>,
    local: Arc<dyn SnapshotStore>,
    online: bool,
    origin: DataOrigin,
}

impl RosterService {
    /// Load players (and any saved formation session) and build the service.
    ///
    /// Loading never fails: an unreachable source falls back to the local
    /// snapshot, and a missing snapshot yields an empty roster.
    pub async fn load(
        config: AppConfig,
        source: Arc<dyn PlayerSource>,
        local: Arc<dyn SnapshotStore>,
    ) -> Self {
        let online = !config.storage.offline;
        let outcome = load_players(source.as_ref(), local.as_ref(), online).await;
        let roster = Roster::from_players(outcome.players);

        let mut session = match read_json::<TeamSession>(local.as_ref(), SESSION_KEY).await {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding saved team session: {}", e);
                None
            }
        };
        if let Some(session) = session.as_mut() {
            let stale: Vec<PlayerId> = session
                .assigned_ids()
                .into_iter()
                .filter(|id| !roster.contains(*id))
                .collect();
            for player_id in stale {
                debug!(player_id, "Dropping player missing from roster out of saved session");
                session.remove_player(player_id);
            }
        }

        info!(
            players = roster.len(),
            origin = %outcome.origin,
            online,
            "Roster service ready"
        );

        Self {
            balancer: Arc::new(SnakeDraftBalancer::new(BalancerConfig::from(&config.teams))),
            recorder: MatchRecorder::new(RecorderConfig::from(&config.rating)),
            config,
            roster,
            session,
            source,
            local,
            online,
            origin: outcome.origin,
        }
    }

    /// Load from the local snapshot only and push it to the data source.
    ///
    /// Edits made while offline live only in the local snapshot, so a sync must
    /// not let the data source copy replace them first. With `storage.offline`
    /// set the roster is saved locally and nothing is forwarded.
    pub async fn push_local(
        mut config: AppConfig,
        source: Arc<dyn PlayerSource>,
        local: Arc<dyn SnapshotStore>,
    ) -> (Self, SaveReport) {
        let reachable = !config.storage.offline;
        config.storage.offline = true;

        let mut service = Self::load(config, source, local).await;
        let report = if reachable {
            match service.set_online(true).await {
                Some(report) => report,
                None => service.sync().await,
            }
        } else {
            service.sync().await
        };
        (service, report)
    }

    /// Replace the balancing algorithm
    pub fn with_balancer(mut self, balancer: Arc<dyn TeamBalancer>) -> Self {
        self.balancer = balancer;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn session(&self) -> Option<&TeamSession> {
        self.session.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    // ---------------------------------------------------------------------
    // Players
    // ---------------------------------------------------------------------

    pub fn player(&self, player_id: PlayerId) -> Result<&Player> {
        self.roster.get(player_id)
    }

    /// Roster listing with display fields
    pub fn list_players(&self, sort: SortKey) -> Vec<PlayerView> {
        self.roster
            .sorted(sort)
            .into_iter()
            .map(PlayerView::from)
            .collect()
    }

    /// Player profile with their best partners
    pub fn profile(&self, player_id: PlayerId) -> Result<ProfileView> {
        let player = self.roster.get(player_id)?;
        let best_partners = self
            .roster
            .best_partners(player_id)?
            .iter()
            .map(PartnerView::from)
            .collect();

        Ok(ProfileView {
            player: PlayerView::from(player),
            best_partners,
        })
    }

    pub async fn add_player(&mut self, name: &str, raw_skill: &str) -> Result<Player> {
        let player = self.roster.add_player(name, raw_skill)?;
        self.persist().await;
        Ok(player)
    }

    pub async fn edit_player(
        &mut self,
        player_id: PlayerId,
        name: &str,
        raw_skill: &str,
    ) -> Result<Player> {
        let player = self.roster.edit_player(player_id, name, raw_skill)?;
        self.persist().await;
        Ok(player)
    }

    /// Delete a player from the roster, from every interaction map and from
    /// whichever team currently holds them
    pub async fn delete_player(&mut self, player_id: PlayerId) -> Result<Player> {
        let removed = self.roster.remove_player(player_id)?;
        if let Some(session) = self.session.as_mut() {
            if session.remove_player(player_id) {
                info!(player_id, "Removed deleted player from their team");
            }
        }
        self.persist().await;
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Teams
    // ---------------------------------------------------------------------

    fn require_roster_size(&self, required: usize) -> Result<()> {
        if self.roster.len() < required {
            return Err(RosterError::InsufficientPlayers {
                required,
                available: self.roster.len(),
            }
            .into());
        }
        Ok(())
    }

    fn active_session(&self) -> Result<&TeamSession> {
        self.session
            .as_ref()
            .ok_or_else(|| RosterError::NoActiveSession.into())
    }

    /// Start a manual formation with empty teams, replacing any current one
    pub async fn start_manual(&mut self, team_count: usize) -> Result<&TeamSession> {
        self.require_roster_size(self.config.teams.min_roster_for_manual)?;
        BalancerConfig::from(&self.config.teams).check_team_count(team_count)?;

        self.session = Some(TeamSession::manual(team_count));
        info!(team_count, "Started manual team formation");

        self.persist().await;
        self.active_session()
    }

    /// Place a roster player on a team of the current session
    pub async fn place_player(&mut self, player_id: PlayerId, team_index: usize) -> Result<()> {
        let player = self.roster.get(player_id)?.clone();
        let session = self.session.as_mut().ok_or(RosterError::NoActiveSession)?;

        session.place_player(&player, team_index)?;
        info!(player_id, team_index, "Placed player on team");

        self.persist().await;
        Ok(())
    }

    /// Roster players not yet placed on any team
    pub fn available_players(&self) -> Vec<&Player> {
        let assigned = self
            .session
            .as_ref()
            .map(|s| s.assigned_ids())
            .unwrap_or_default();

        self.roster
            .players()
            .iter()
            .filter(|p| !assigned.contains(&p.id))
            .collect()
    }

    /// Balance the selected players into `team_count` teams, replacing any current formation
    pub async fn form_auto_teams(
        &mut self,
        selection: &[PlayerId],
        team_count: usize,
    ) -> Result<&TeamSession> {
        self.require_roster_size(self.config.teams.min_roster_for_auto)?;

        let mut unique = HashSet::new();
        let selection: Vec<PlayerId> = selection
            .iter()
            .copied()
            .filter(|id| unique.insert(*id))
            .collect();
        let players = self.roster.select(&selection)?;
        let teams = self.balancer.balance(&players, team_count)?;

        self.session = Some(TeamSession::auto(teams));
        info!(
            team_count,
            players = players.len(),
            "Formed balanced teams"
        );

        self.persist().await;
        self.active_session()
    }

    /// Discard the current formation
    pub async fn reset_teams(&mut self) {
        if self.session.take().is_some() {
            info!("Reset teams");
        }
        self.persist().await;
    }

    /// Average directional interaction of a team in the current session
    pub fn team_interaction(&self, team_index: usize) -> Result<f64> {
        let team = self.active_session()?.team(team_index)?;
        Ok(team_interaction(&team.players))
    }

    /// Record a match and/or cup outcome for a team.
    ///
    /// The team's snapshots are updated in place and written back over the
    /// roster records with the same ids.
    pub async fn record_result(
        &mut self,
        team_index: usize,
        match_outcome: Option<Outcome>,
        cup_outcome: Option<Outcome>,
    ) -> Result<RecordedResult> {
        if match_outcome.is_none() && cup_outcome.is_none() {
            return Err(RosterError::invalid_input("no match or cup outcome given").into());
        }

        let session = self.session.as_mut().ok_or(RosterError::NoActiveSession)?;
        let team = session.team_mut(team_index)?;
        let result = self
            .recorder
            .record(&mut team.players, match_outcome, cup_outcome);

        for player in &result.players {
            self.roster.replace(Player {
                is_captain: false,
                ..player.clone()
            });
        }

        info!(
            team_index,
            players = result.players.len(),
            "Recorded result ({})",
            result.summary()
        );

        self.persist().await;
        Ok(result)
    }

    // ---------------------------------------------------------------------
    // Persistence and connectivity
    // ---------------------------------------------------------------------

    async fn persist(&self) {
        self.save().await;
    }

    /// Save players and the formation session locally, forwarding players when online
    pub async fn save(&self) -> SaveReport {
        let report = save_players(
            self.roster.players(),
            self.source.as_ref(),
            self.local.as_ref(),
            self.online,
        )
        .await;

        let session_saved = match &self.session {
            Some(session) => write_json(self.local.as_ref(), SESSION_KEY, session).await,
            None => self.local.remove(SESSION_KEY).await,
        };
        if let Err(e) = session_saved {
            error!("Failed to save team session locally: {}", e);
        }

        report
    }

    /// Push the current roster to the data source, if online
    pub async fn sync(&self) -> SaveReport {
        if !self.online {
            info!("Offline, keeping changes local");
        }
        self.save().await
    }

    /// Update connectivity. Coming back online pushes the current roster to the data source.
    pub async fn set_online(&mut self, online: bool) -> Option<SaveReport> {
        let was_online = self.online;
        self.online = online;

        match (was_online, online) {
            (false, true) => {
                info!("Connectivity restored, syncing players");
                Some(self.sync().await)
            }
            (true, false) => {
                warn!("Connectivity lost, changes will stay local");
                None
            }
            _ => None,
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport::gather(self, self.source.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::local::InMemorySnapshotStore;
    use crate::storage::source::StaticPlayerSource;

    async fn service_with(skills: &[&str]) -> RosterService {
        let mut service = RosterService::load(
            AppConfig::default(),
            Arc::new(StaticPlayerSource::default()),
            Arc::new(InMemorySnapshotStore::new()),
        )
        .await;
        for (i, skill) in skills.iter().enumerate() {
            service
                .add_player(&format!("Player {}", i + 1), skill)
                .await
                .unwrap();
        }
        service
    }

    fn kind(err: &anyhow::Error) -> Option<&RosterError> {
        err.downcast_ref::<RosterError>()
    }

    #[tokio::test]
    async fn test_manual_formation_requires_two_players() {
        let mut service = service_with(&["0.5"]).await;
        let err = service.start_manual(2).await.unwrap_err();
        assert_eq!(
            kind(&err),
            Some(&RosterError::InsufficientPlayers {
                required: 2,
                available: 1
            })
        );
    }

    #[tokio::test]
    async fn test_auto_formation_requires_four_players() {
        let mut service = service_with(&["0.5", "0.6", "0.7"]).await;
        let err = service.form_auto_teams(&[1, 2, 3], 2).await.unwrap_err();
        assert!(matches!(
            kind(&err),
            Some(RosterError::InsufficientPlayers { .. })
        ));
    }

    #[tokio::test]
    async fn test_place_without_session() {
        let mut service = service_with(&["0.5", "0.6"]).await;
        let err = service.place_player(1, 0).await.unwrap_err();
        assert_eq!(kind(&err), Some(&RosterError::NoActiveSession));
    }

    #[tokio::test]
    async fn test_available_players_excludes_placed() {
        let mut service = service_with(&["0.5", "0.6", "0.7"]).await;
        service.start_manual(2).await.unwrap();
        service.place_player(2, 1).await.unwrap();

        let available: Vec<PlayerId> = service.available_players().iter().map(|p| p.id).collect();
        assert_eq!(available, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_record_without_outcome_is_rejected() {
        let mut service = service_with(&["0.5", "0.6", "0.7", "0.8"]).await;
        service.form_auto_teams(&[1, 2, 3, 4], 2).await.unwrap();

        let err = service.record_result(0, None, None).await.unwrap_err();
        assert!(matches!(kind(&err), Some(RosterError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_selection_counts_once() {
        let mut service = service_with(&["0.5", "0.6", "0.7", "0.8"]).await;
        let err = service
            .form_auto_teams(&[1, 1, 2, 2, 3], 2)
            .await
            .unwrap_err();
        assert_eq!(
            kind(&err),
            Some(&RosterError::InsufficientPlayers {
                required: 4,
                available: 3
            })
        );
    }

    #[tokio::test]
    async fn test_team_interaction_of_unknown_team() {
        let mut service = service_with(&["0.5", "0.6"]).await;
        assert_eq!(
            kind(&service.team_interaction(0).unwrap_err()),
            Some(&RosterError::NoActiveSession)
        );

        service.start_manual(2).await.unwrap();
        assert_eq!(service.team_interaction(1).unwrap(), 0.0);
        assert_eq!(
            kind(&service.team_interaction(4).unwrap_err()),
            Some(&RosterError::TeamNotFound { team_index: 4 })
        );
    }
}
