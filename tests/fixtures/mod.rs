//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use squad_forge::config::AppConfig;
use squad_forge::error::Result;
use squad_forge::storage::{InMemorySnapshotStore, PlayerSource, StaticPlayerSource};
use squad_forge::types::{Player, PlayerId};
use squad_forge::{RosterError, RosterService};
use std::sync::Arc;

mock! {
    pub Source {}

    #[async_trait]
    impl PlayerSource for Source {
        async fn fetch_players(&self) -> Result<Vec<Player>>;
        async fn push_players(&self, players: &[Player]) -> Result<()>;
        fn describe(&self) -> String;
    }
}

/// Mock source that can never be reached
pub fn unreachable_source() -> MockSource {
    let mut source = MockSource::new();
    source.expect_fetch_players().returning(|| {
        Err(RosterError::LoadFailure {
            message: "network unreachable".to_string(),
        }
        .into())
    });
    source.expect_push_players().returning(|_| {
        Err(RosterError::PersistenceFailed {
            message: "network unreachable".to_string(),
        }
        .into())
    });
    source
        .expect_describe()
        .returning(|| "mock:unreachable".to_string());
    source
}

/// Players with the given skills, ids starting at 1, every pair seeded with
/// neutral interactions in both directions
pub fn players_with_skills(skills: &[f64]) -> Vec<Player> {
    let ids: Vec<PlayerId> = (1..=skills.len() as PlayerId).collect();
    skills
        .iter()
        .zip(&ids)
        .map(|(&skill, &id)| {
            let mut player = Player::new(id, format!("Player {}", id), skill);
            for &other in &ids {
                player.set_interaction(other, 0.5);
            }
            player
        })
        .collect()
}

/// Eight players of descending skill
pub fn club_roster() -> Vec<Player> {
    players_with_skills(&[0.95, 0.85, 0.8, 0.7, 0.65, 0.5, 0.4, 0.3])
}

/// Everything a test needs to inspect around a service
pub struct TestSystem {
    pub service: RosterService,
    pub source: Arc<StaticPlayerSource>,
    pub local: Arc<InMemorySnapshotStore>,
}

/// Service loaded online from an in-memory source holding `players`
pub async fn create_test_system(players: Vec<Player>) -> TestSystem {
    let source = Arc::new(StaticPlayerSource::new(players));
    let local = Arc::new(InMemorySnapshotStore::new());
    let service = RosterService::load(AppConfig::default(), source.clone(), local.clone()).await;

    TestSystem {
        service,
        source,
        local,
    }
}

/// Config with the data source switched off
pub fn offline_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.offline = true;
    config
}

pub fn kind(err: &anyhow::Error) -> Option<&RosterError> {
    err.downcast_ref::<RosterError>()
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
