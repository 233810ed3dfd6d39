//! Benchmark for a full evaluator pass over the shipped catalog.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use laurel::adapters::sqlite::{
    create_migrated_test_pool, SqliteAchievementRepository, SqliteUserStatsRepository,
};
use laurel::domain::models::StatDeltas;
use laurel::services::{AchievementCatalog, ProgressionService};

type Engine = ProgressionService<SqliteUserStatsRepository, SqliteAchievementRepository>;

async fn setup_engine() -> Engine {
    let pool = create_migrated_test_pool().await.expect("test pool");
    let engine = ProgressionService::new(
        Arc::new(SqliteUserStatsRepository::new(pool.clone())),
        Arc::new(SqliteAchievementRepository::new(pool)),
        AchievementCatalog::default(),
    );
    engine.seed_catalog().await.expect("seed");

    // A user with mid-run stats so some criteria pass and some fail.
    engine
        .increment_counters(
            "bench-user",
            &StatDeltas::default()
                .clients_added(5)
                .contracts_uploaded(3)
                .commission_protected(15_000),
        )
        .await
        .expect("increment");

    engine
}

fn bench_evaluator_pass(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let engine = rt.block_on(setup_engine());

    c.bench_function("check_achievements_pass", |b| {
        b.to_async(&rt)
            .iter(|| async { engine.check_achievements("bench-user").await.expect("check") });
    });
}

criterion_group!(benches, bench_evaluator_pass);
criterion_main!(benches);
