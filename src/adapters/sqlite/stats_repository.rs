//! SQLite implementation of the UserStatsRepository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{StatDeltas, UserStats};
use crate::domain::ports::UserStatsRepository;

use super::{parse_datetime, parse_optional_date};

#[derive(Clone)]
pub struct SqliteUserStatsRepository {
    pool: SqlitePool,
}

impl SqliteUserStatsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const STATS_COLUMNS: &str = "user_id, clients_added, contracts_uploaded, showings_scheduled, \
     breaches_resolved, commission_protected, alerts_actioned, consecutive_login_days, \
     longest_streak, last_login_date, days_active, total_points, experience_points, level, \
     created_at, updated_at";

#[async_trait]
impl UserStatsRepository for SqliteUserStatsRepository {
    async fn ensure_user(&self, user_id: &str) -> DomainResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT OR IGNORE INTO user_stats (user_id, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, user_id: &str) -> DomainResult<Option<UserStats>> {
        let query = format!("SELECT {STATS_COLUMNS} FROM user_stats WHERE user_id = ?");
        let row: Option<UserStatsRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserStats::try_from).transpose()
    }

    async fn increment(&self, user_id: &str, deltas: &StatDeltas) -> DomainResult<()> {
        // Relative adds at the storage layer keep concurrent triggers safe.
        let result = sqlx::query(
            r#"UPDATE user_stats SET
                clients_added = clients_added + ?,
                contracts_uploaded = contracts_uploaded + ?,
                showings_scheduled = showings_scheduled + ?,
                breaches_resolved = breaches_resolved + ?,
                commission_protected = commission_protected + ?,
                alerts_actioned = alerts_actioned + ?,
                updated_at = ?
               WHERE user_id = ?"#,
        )
        .bind(deltas.clients_added)
        .bind(deltas.contracts_uploaded)
        .bind(deltas.showings_scheduled)
        .bind(deltas.breaches_resolved)
        .bind(deltas.commission_protected)
        .bind(deltas.alerts_actioned)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserStatsNotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn add_points(&self, user_id: &str, points: i64) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE user_stats SET
                total_points = total_points + ?,
                experience_points = experience_points + ?,
                updated_at = ?
               WHERE user_id = ?"#,
        )
        .bind(points)
        .bind(points)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserStatsNotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn update_streak(&self, stats: &UserStats) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE user_stats SET
                consecutive_login_days = ?,
                longest_streak = ?,
                last_login_date = ?,
                days_active = ?,
                updated_at = ?
               WHERE user_id = ?"#,
        )
        .bind(stats.consecutive_login_days)
        .bind(stats.longest_streak)
        .bind(stats.last_login_date.map(|d| d.format("%Y-%m-%d").to_string()))
        .bind(stats.days_active)
        .bind(Utc::now().to_rfc3339())
        .bind(&stats.user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserStatsNotFound(stats.user_id.clone()));
        }
        Ok(())
    }

    async fn raise_level(&self, user_id: &str, level: i64) -> DomainResult<bool> {
        // Guarded write keeps levels monotonic even under stale callers.
        let result = sqlx::query(
            "UPDATE user_stats SET level = ?, updated_at = ? WHERE user_id = ? AND level < ?",
        )
        .bind(level)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .bind(level)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct UserStatsRow {
    user_id: String,
    clients_added: i64,
    contracts_uploaded: i64,
    showings_scheduled: i64,
    breaches_resolved: i64,
    commission_protected: i64,
    alerts_actioned: i64,
    consecutive_login_days: i64,
    longest_streak: i64,
    last_login_date: Option<String>,
    days_active: i64,
    total_points: i64,
    experience_points: i64,
    level: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserStatsRow> for UserStats {
    type Error = DomainError;

    fn try_from(row: UserStatsRow) -> Result<Self, Self::Error> {
        Ok(UserStats {
            user_id: row.user_id,
            clients_added: row.clients_added,
            contracts_uploaded: row.contracts_uploaded,
            showings_scheduled: row.showings_scheduled,
            breaches_resolved: row.breaches_resolved,
            commission_protected: row.commission_protected,
            alerts_actioned: row.alerts_actioned,
            consecutive_login_days: row.consecutive_login_days,
            longest_streak: row.longest_streak,
            last_login_date: parse_optional_date(row.last_login_date)?,
            days_active: row.days_active,
            total_points: row.total_points,
            experience_points: row.experience_points,
            level: row.level,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use chrono::NaiveDate;

    async fn setup_repo() -> SqliteUserStatsRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteUserStatsRepository::new(pool)
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let repo = setup_repo().await;

        repo.ensure_user("user-1").await.unwrap();
        repo.ensure_user("user-1").await.unwrap();

        let stats = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(stats.clients_added, 0);
        assert_eq!(stats.level, 1);
    }

    #[tokio::test]
    async fn test_increment_accumulates() {
        let repo = setup_repo().await;
        repo.ensure_user("user-1").await.unwrap();

        let deltas = StatDeltas::default().clients_added(1).alerts_actioned(2);
        repo.increment("user-1", &deltas).await.unwrap();
        repo.increment("user-1", &deltas).await.unwrap();

        let stats = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(stats.clients_added, 2);
        assert_eq!(stats.alerts_actioned, 4);
        assert_eq!(stats.contracts_uploaded, 0);
    }

    #[tokio::test]
    async fn test_increment_unknown_user_errors() {
        let repo = setup_repo().await;
        let err = repo
            .increment("ghost", &StatDeltas::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserStatsNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_points_credits_both_totals() {
        let repo = setup_repo().await;
        repo.ensure_user("user-1").await.unwrap();

        repo.add_points("user-1", 20).await.unwrap();
        repo.add_points("user-1", 50).await.unwrap();

        let stats = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(stats.total_points, 70);
        assert_eq!(stats.experience_points, 70);
    }

    #[tokio::test]
    async fn test_raise_level_is_monotonic() {
        let repo = setup_repo().await;
        repo.ensure_user("user-1").await.unwrap();

        assert!(repo.raise_level("user-1", 3).await.unwrap());
        // Lower or equal levels never regress the stored value.
        assert!(!repo.raise_level("user-1", 2).await.unwrap());
        assert!(!repo.raise_level("user-1", 3).await.unwrap());

        let stats = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(stats.level, 3);
    }

    #[tokio::test]
    async fn test_streak_round_trip() {
        let repo = setup_repo().await;
        repo.ensure_user("user-1").await.unwrap();

        let mut stats = repo.get("user-1").await.unwrap().unwrap();
        stats.apply_login(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        repo.update_streak(&stats).await.unwrap();

        let stored = repo.get("user-1").await.unwrap().unwrap();
        assert_eq!(stored.consecutive_login_days, 1);
        assert_eq!(
            stored.last_login_date,
            NaiveDate::from_ymd_opt(2025, 3, 10)
        );
    }
}
