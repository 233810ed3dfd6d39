//! Integration tests for the progression engine.
//!
//! Coverage:
//! 1. The concrete client-unlock scenario end to end
//! 2. Evaluator idempotency and point conservation
//! 3. The login-streak state machine through the service surface
//! 4. Category grouping of the shipped catalog
//! 5. Catalog re-seeding across a simulated process restart
//! 6. Notification handoff

use std::sync::Arc;

use chrono::NaiveDate;
use laurel::adapters::sqlite::{
    initialize_database, SqliteAchievementRepository, SqliteUserStatsRepository,
};
use laurel::domain::models::{DatabaseConfig, StatDeltas};
use laurel::services::{AchievementCatalog, ProgressionService};

mod common;
use common::{setup_engine, Engine};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).expect("valid day")
}

/// Sum of definition points over a user's unlocked achievements.
async fn awarded_points(engine: &Engine, user_id: &str) -> i64 {
    engine
        .get_user_achievements(user_id)
        .await
        .expect("Failed to list achievements")
        .iter()
        .map(|u| u.definition.points)
        .sum()
}

#[tokio::test]
async fn test_client_scenario_end_to_end() {
    let engine = setup_engine().await;

    // First client unlocks first_client for 20 points.
    let unlocked = engine
        .increment_counters("agent-7", &StatDeltas::default().clients_added(1))
        .await
        .unwrap();
    assert_eq!(
        unlocked.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        vec!["first_client"]
    );

    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.total_points, 20);
    assert_eq!(stats.level, 1);

    // Four more increments reach five clients and the collector unlock.
    let mut names = Vec::new();
    for _ in 0..4 {
        let newly = engine
            .increment_counters("agent-7", &StatDeltas::default().clients_added(1))
            .await
            .unwrap();
        names.extend(newly.into_iter().map(|d| d.name));
    }
    assert_eq!(names, vec!["client_collector"]);

    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.clients_added, 5);
    assert_eq!(stats.total_points, 70);
    assert_eq!(stats.experience_points, 70);
    assert_eq!(stats.level, 1);

    // 70 points stays far below the 1000-point milestone.
    let unlocked_names: Vec<String> = engine
        .get_user_achievements("agent-7")
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.definition.name)
        .collect();
    assert!(!unlocked_names.contains(&"thousand_club".to_string()));
}

#[tokio::test]
async fn test_evaluator_idempotent_and_points_conserved() {
    let engine = setup_engine().await;

    engine
        .increment_counters(
            "agent-7",
            &StatDeltas::default()
                .clients_added(5)
                .contracts_uploaded(1)
                .showings_scheduled(1),
        )
        .await
        .unwrap();

    let before = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(before.total_points, awarded_points(&engine, "agent-7").await);

    // Re-running the evaluator with unchanged stats unlocks nothing.
    let again = engine.check_achievements("agent-7").await.unwrap();
    assert!(again.is_empty());

    let after = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(after.total_points, before.total_points);
    assert_eq!(after.total_points, awarded_points(&engine, "agent-7").await);
}

#[tokio::test]
async fn test_commission_milestones() {
    let engine = setup_engine().await;

    let unlocked = engine
        .increment_counters(
            "agent-7",
            &StatDeltas::default().commission_protected(12_500),
        )
        .await
        .unwrap();
    assert_eq!(
        unlocked.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        vec!["guardian_10k"]
    );

    // Crossing the next threshold later unlocks the bigger guardian.
    let unlocked = engine
        .increment_counters(
            "agent-7",
            &StatDeltas::default().commission_protected(90_000),
        )
        .await
        .unwrap();
    assert_eq!(
        unlocked.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
        vec!["guardian_100k"]
    );

    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.commission_protected, 102_500);
    assert_eq!(stats.total_points, 350);
    assert_eq!(stats.level, 4);
}

#[tokio::test]
async fn test_login_streak_state_machine() {
    let engine = setup_engine().await;

    engine.record_login_on("agent-7", day(1)).await.unwrap();
    engine.record_login_on("agent-7", day(2)).await.unwrap();

    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.consecutive_login_days, 2);

    // Same-day repeat changes nothing.
    engine.record_login_on("agent-7", day(2)).await.unwrap();
    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.consecutive_login_days, 2);
    assert_eq!(stats.days_active, 2);

    // A gap resets the streak; the longest streak survives.
    engine.record_login_on("agent-7", day(6)).await.unwrap();
    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.consecutive_login_days, 1);
    assert_eq!(stats.longest_streak, 2);
    assert_eq!(stats.days_active, 3);
    assert_eq!(stats.last_login_date, Some(day(6)));
}

#[tokio::test]
async fn test_week_long_streak_unlocks_both_tiers() {
    let engine = setup_engine().await;

    let mut names = Vec::new();
    for d in 1..=7 {
        let newly = engine.record_login_on("agent-7", day(d)).await.unwrap();
        names.extend(newly.into_iter().map(|d| d.name));
    }

    assert_eq!(names, vec!["streak_starter", "streak_master"]);

    let progress = engine.get_user_progress("agent-7").await.unwrap();
    assert_eq!(progress.total_points, 100);
    assert_eq!(progress.level, 2);
    assert_eq!(progress.next_level_points, 200);
}

#[tokio::test]
async fn test_categories_partition_the_catalog() {
    let engine = setup_engine().await;
    let groups = engine.get_achievement_categories().await.unwrap();

    assert_eq!(groups.len(), 5);

    let mut seen = std::collections::HashSet::new();
    let mut total = 0;
    for group in &groups {
        assert!(
            !group.achievements.is_empty(),
            "category {:?} should not be empty",
            group.category
        );
        for achievement in &group.achievements {
            assert_eq!(achievement.category, group.category);
            assert!(seen.insert(achievement.name.clone()), "duplicate definition");
            total += 1;
        }
    }
    assert_eq!(total, 15);
}

#[tokio::test]
async fn test_seeding_survives_process_restart() {
    // On-disk database so two engine instances see the same rows.
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("laurel.db").to_string_lossy().into_owned(),
        max_connections: 2,
    };

    let build = |pool: sqlx::SqlitePool| {
        ProgressionService::new(
            Arc::new(SqliteUserStatsRepository::new(pool.clone())),
            Arc::new(SqliteAchievementRepository::new(pool)),
            AchievementCatalog::default(),
        )
    };

    let pool = initialize_database(&config).await.unwrap();
    let engine = build(pool.clone());
    let inserted = engine.seed_catalog().await.unwrap();
    assert_eq!(inserted, 15);

    engine
        .increment_counters("agent-7", &StatDeltas::default().clients_added(1))
        .await
        .unwrap();
    drop(engine);
    pool.close().await;

    // Fresh process: the default catalog carries fresh ids, but seeding
    // is keyed by name and must not duplicate or re-award anything.
    let pool = initialize_database(&config).await.unwrap();
    let engine = build(pool);
    let inserted = engine.seed_catalog().await.unwrap();
    assert_eq!(inserted, 0);

    let newly = engine.check_achievements("agent-7").await.unwrap();
    assert!(newly.is_empty());

    let stats = engine.get_user_stats("agent-7").await.unwrap();
    assert_eq!(stats.total_points, 20);
    assert_eq!(engine.get_user_achievements("agent-7").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_notification_handoff_flow() {
    let engine = setup_engine().await;

    engine
        .increment_counters("agent-7", &StatDeltas::default().clients_added(5))
        .await
        .unwrap();

    let pending = engine.pending_notifications("agent-7").await.unwrap();
    assert_eq!(pending.len(), 2);

    for unlock in &pending {
        engine
            .mark_notified("agent-7", unlock.definition.id)
            .await
            .unwrap();
    }
    assert!(engine
        .pending_notifications("agent-7")
        .await
        .unwrap()
        .is_empty());

    // Already-notified awards still show as unlocked.
    assert_eq!(engine.get_user_achievements("agent-7").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_stats_are_lazily_created() {
    let engine = setup_engine().await;

    // Reading a never-seen user self-heals instead of erroring.
    let stats = engine.get_user_stats("brand-new").await.unwrap();
    assert_eq!(stats.clients_added, 0);
    assert_eq!(stats.level, 1);

    let progress = engine.get_user_progress("brand-new").await.unwrap();
    assert_eq!(progress.completion_percentage, 0);
    assert_eq!(progress.unlocked.len(), 0);
}
