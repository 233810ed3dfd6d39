//! Common test utilities for integration tests.

use std::sync::Arc;

use laurel::adapters::sqlite::{
    create_migrated_test_pool, SqliteAchievementRepository, SqliteUserStatsRepository,
};
use laurel::services::{AchievementCatalog, ProgressionService};

pub type Engine = ProgressionService<SqliteUserStatsRepository, SqliteAchievementRepository>;

/// Build a seeded engine over an in-memory database.
pub async fn setup_engine() -> Engine {
    let pool = create_migrated_test_pool()
        .await
        .expect("Failed to create test pool");

    let engine = ProgressionService::new(
        Arc::new(SqliteUserStatsRepository::new(pool.clone())),
        Arc::new(SqliteAchievementRepository::new(pool)),
        AchievementCatalog::default(),
    );
    engine.seed_catalog().await.expect("Failed to seed catalog");
    engine
}

/// Setup test logging.
///
/// Call at the beginning of tests that need log output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
