//! SQLite implementation of the AchievementRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AchievementCategory, AchievementDefinition, AchievementTier, UnlockCriteria,
    UnlockedAchievement, UserAchievement,
};
use crate::domain::ports::AchievementRepository;

use super::{parse_datetime, parse_uuid};

#[derive(Clone)]
pub struct SqliteAchievementRepository {
    pool: SqlitePool,
}

impl SqliteAchievementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const DEFINITION_COLUMNS: &str =
    "id, name, title, description, icon, category, tier, points, metric, target, timeframe, created_at";

#[async_trait]
impl AchievementRepository for SqliteAchievementRepository {
    async fn insert_definition_if_absent(
        &self,
        definition: &AchievementDefinition,
    ) -> DomainResult<bool> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO achievements
               (id, name, title, description, icon, category, tier, points, metric, target, timeframe, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(definition.id.to_string())
        .bind(&definition.name)
        .bind(&definition.title)
        .bind(&definition.description)
        .bind(&definition.icon)
        .bind(definition.category.as_str())
        .bind(definition.tier.as_str())
        .bind(definition.points)
        .bind(&definition.criteria.metric)
        .bind(definition.criteria.target)
        .bind(definition.criteria.timeframe.as_deref())
        .bind(definition.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_definition_by_name(
        &self,
        name: &str,
    ) -> DomainResult<Option<AchievementDefinition>> {
        let query = format!("SELECT {DEFINITION_COLUMNS} FROM achievements WHERE name = ?");
        let row: Option<DefinitionRow> = sqlx::query_as(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AchievementDefinition::try_from).transpose()
    }

    async fn list_definitions(&self) -> DomainResult<Vec<AchievementDefinition>> {
        let query =
            format!("SELECT {DEFINITION_COLUMNS} FROM achievements ORDER BY category, target, name");
        let rows: Vec<DefinitionRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count_definitions(&self) -> DomainResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM achievements")
            .fetch_one(&self.pool)
            .await?;
        #[allow(clippy::cast_sign_loss)]
        Ok(count as u64)
    }

    async fn try_award(&self, award: &UserAchievement) -> DomainResult<bool> {
        // The UNIQUE(user_id, achievement_id) constraint is the
        // authoritative guard; a duplicate insert lands as a no-op.
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO user_achievements
               (id, user_id, achievement_id, completed, notified, unlocked_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(award.id.to_string())
        .bind(&award.user_id)
        .bind(award.achievement_id.to_string())
        .bind(award.completed)
        .bind(award.notified)
        .bind(award.unlocked_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_awards(&self, user_id: &str) -> DomainResult<Vec<UserAchievement>> {
        let rows: Vec<AwardRow> = sqlx::query_as(
            "SELECT id, user_id, achievement_id, completed, notified, unlocked_at
             FROM user_achievements WHERE user_id = ? ORDER BY unlocked_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_unlocked(&self, user_id: &str) -> DomainResult<Vec<UnlockedAchievement>> {
        self.list_joined(user_id, false).await
    }

    async fn list_pending_notification(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<UnlockedAchievement>> {
        self.list_joined(user_id, true).await
    }

    async fn mark_notified(&self, user_id: &str, achievement_id: Uuid) -> DomainResult<()> {
        sqlx::query(
            "UPDATE user_achievements SET notified = 1 WHERE user_id = ? AND achievement_id = ?",
        )
        .bind(user_id)
        .bind(achievement_id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl SqliteAchievementRepository {
    async fn list_joined(
        &self,
        user_id: &str,
        pending_only: bool,
    ) -> DomainResult<Vec<UnlockedAchievement>> {
        let mut query = String::from(
            "SELECT ua.id, ua.user_id, ua.achievement_id, ua.completed, ua.notified, ua.unlocked_at,
                    a.id, a.name, a.title, a.description, a.icon, a.category, a.tier, a.points,
                    a.metric, a.target, a.timeframe, a.created_at
             FROM user_achievements ua
             JOIN achievements a ON a.id = ua.achievement_id
             WHERE ua.user_id = ?",
        );
        if pending_only {
            query.push_str(" AND ua.notified = 0");
        }
        query.push_str(" ORDER BY ua.unlocked_at");

        let rows: Vec<JoinedRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct DefinitionRow {
    id: String,
    name: String,
    title: String,
    description: String,
    icon: String,
    category: String,
    tier: String,
    points: i64,
    metric: String,
    target: i64,
    timeframe: Option<String>,
    created_at: String,
}

impl TryFrom<DefinitionRow> for AchievementDefinition {
    type Error = DomainError;

    fn try_from(row: DefinitionRow) -> Result<Self, Self::Error> {
        let category = AchievementCategory::from_str(&row.category).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid category: {}", row.category))
        })?;
        let tier = AchievementTier::from_str(&row.tier).ok_or_else(|| {
            DomainError::SerializationError(format!("Invalid tier: {}", row.tier))
        })?;

        Ok(AchievementDefinition {
            id: parse_uuid(&row.id)?,
            name: row.name,
            title: row.title,
            description: row.description,
            icon: row.icon,
            category,
            tier,
            points: row.points,
            criteria: UnlockCriteria {
                metric: row.metric,
                target: row.target,
                timeframe: row.timeframe,
            },
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AwardRow {
    id: String,
    user_id: String,
    achievement_id: String,
    completed: bool,
    notified: bool,
    unlocked_at: String,
}

impl TryFrom<AwardRow> for UserAchievement {
    type Error = DomainError;

    fn try_from(row: AwardRow) -> Result<Self, Self::Error> {
        Ok(UserAchievement {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            achievement_id: parse_uuid(&row.achievement_id)?,
            completed: row.completed,
            notified: row.notified,
            unlocked_at: parse_datetime(&row.unlocked_at)?,
        })
    }
}

/// Row shape for the award/definition join. Columns are read positionally
/// because the two id columns collide by name.
struct JoinedRow {
    award: AwardRow,
    definition: DefinitionRow,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for JoinedRow {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        Ok(Self {
            award: AwardRow {
                id: row.try_get(0)?,
                user_id: row.try_get(1)?,
                achievement_id: row.try_get(2)?,
                completed: row.try_get(3)?,
                notified: row.try_get(4)?,
                unlocked_at: row.try_get(5)?,
            },
            definition: DefinitionRow {
                id: row.try_get(6)?,
                name: row.try_get(7)?,
                title: row.try_get(8)?,
                description: row.try_get(9)?,
                icon: row.try_get(10)?,
                category: row.try_get(11)?,
                tier: row.try_get(12)?,
                points: row.try_get(13)?,
                metric: row.try_get(14)?,
                target: row.try_get(15)?,
                timeframe: row.try_get(16)?,
                created_at: row.try_get(17)?,
            },
        })
    }
}

impl TryFrom<JoinedRow> for UnlockedAchievement {
    type Error = DomainError;

    fn try_from(row: JoinedRow) -> Result<Self, Self::Error> {
        Ok(UnlockedAchievement {
            award: row.award.try_into()?,
            definition: row.definition.try_into()?,
        })
    }
}
