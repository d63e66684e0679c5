//! Performance benchmarks for team balancing and result recording

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use squad_forge::config::AppConfig;
use squad_forge::rating::MatchRecorder;
use squad_forge::storage::{InMemorySnapshotStore, StaticPlayerSource};
use squad_forge::teams::{BalancerConfig, SnakeDraftBalancer, TeamBalancer};
use squad_forge::types::{Outcome, Player, PlayerId};
use squad_forge::RosterService;
use std::sync::Arc;

fn bench_roster(size: u32) -> Vec<Player> {
    let ids: Vec<PlayerId> = (1..=size).collect();
    ids.iter()
        .map(|&id| {
            let skill = 0.1 + (id % 10) as f64 * 0.09;
            let mut player = Player::new(id, format!("Player {}", id), skill);
            for &other in &ids {
                player.set_interaction(other, 0.5);
            }
            player
        })
        .collect()
}

fn bench_snake_draft(c: &mut Criterion) {
    let balancer = SnakeDraftBalancer::new(BalancerConfig::default());
    let small = bench_roster(8);
    let large = bench_roster(40);

    c.bench_function("snake_draft_8_players_2_teams", |b| {
        b.iter(|| black_box(balancer.balance(&small, 2)))
    });

    c.bench_function("snake_draft_40_players_10_teams", |b| {
        b.iter(|| black_box(balancer.balance(&large, 10)))
    });
}

fn bench_record_result(c: &mut Criterion) {
    let recorder = MatchRecorder::default();
    let team = bench_roster(10);

    c.bench_function("record_match_win_10_players", |b| {
        b.iter(|| {
            let mut players = team.clone();
            black_box(recorder.record(&mut players, Some(Outcome::Win), Some(Outcome::Win)))
        })
    });
}

fn bench_service_formation(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let players = bench_roster(40);
    let selection: Vec<PlayerId> = players.iter().map(|p| p.id).collect();

    c.bench_function("service_auto_formation_and_record", |b| {
        b.iter(|| {
            rt.block_on(async {
                let mut service = RosterService::load(
                    AppConfig::default(),
                    Arc::new(StaticPlayerSource::new(players.clone())),
                    Arc::new(InMemorySnapshotStore::new()),
                )
                .await;

                service.form_auto_teams(&selection, 4).await.unwrap();
                black_box(service.record_result(0, Some(Outcome::Win), None).await)
            })
        })
    });
}

criterion_group!(
    benches,
    bench_snake_draft,
    bench_record_result,
    bench_service_formation
);
criterion_main!(benches);
