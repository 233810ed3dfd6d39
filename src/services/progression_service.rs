//! Progression service: registry seeding, counter triggers, the
//! achievement evaluator, the leveler, and the read-only query surface.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AchievementCategory, AchievementCategoryGroup, AchievementDefinition, StatDeltas,
    UnlockedAchievement, UserAchievement, UserProgress, UserStats,
};
use crate::domain::ports::{AchievementRepository, UserStatsRepository};

use super::catalog::AchievementCatalog;

pub struct ProgressionService<S: UserStatsRepository, A: AchievementRepository> {
    stats: Arc<S>,
    achievements: Arc<A>,
    catalog: AchievementCatalog,
}

impl<S: UserStatsRepository, A: AchievementRepository> ProgressionService<S, A> {
    pub fn new(stats: Arc<S>, achievements: Arc<A>, catalog: AchievementCatalog) -> Self {
        Self {
            stats,
            achievements,
            catalog,
        }
    }

    /// Idempotently seed the injected catalog into storage.
    ///
    /// Insert-if-absent keyed by unique name; catalog changes are
    /// deploy-time, so there is no update or delete path.
    pub async fn seed_catalog(&self) -> DomainResult<usize> {
        let mut inserted = 0;
        for definition in self.catalog.definitions() {
            definition
                .validate()
                .map_err(DomainError::ValidationFailed)?;
            if self
                .achievements
                .insert_definition_if_absent(definition)
                .await?
            {
                inserted += 1;
            }
        }
        if inserted > 0 {
            info!(inserted, "seeded achievement definitions");
        }
        Ok(inserted)
    }

    /// Apply counter deltas for a user, then evaluate achievements.
    ///
    /// Returns the definitions newly unlocked by this trigger.
    pub async fn increment_counters(
        &self,
        user_id: &str,
        deltas: &StatDeltas,
    ) -> DomainResult<Vec<AchievementDefinition>> {
        deltas.validate().map_err(DomainError::ValidationFailed)?;

        self.stats.ensure_user(user_id).await?;
        self.stats.increment(user_id, deltas).await?;

        self.check_achievements(user_id).await
    }

    /// Record a login for today and advance the streak state machine.
    pub async fn record_login(&self, user_id: &str) -> DomainResult<Vec<AchievementDefinition>> {
        self.record_login_on(user_id, Utc::now().date_naive()).await
    }

    /// Record a login for an explicit calendar day.
    ///
    /// Same-day repeats are a no-op and skip the evaluator.
    pub async fn record_login_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<AchievementDefinition>> {
        self.stats.ensure_user(user_id).await?;
        let mut stats = self
            .stats
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::UserStatsNotFound(user_id.to_string()))?;

        let transition = stats.apply_login(date);
        debug!(user_id, ?transition, streak = stats.consecutive_login_days, "login recorded");

        if !transition.is_change() {
            return Ok(Vec::new());
        }

        self.stats.update_streak(&stats).await?;
        self.check_achievements(user_id).await
    }

    /// Evaluate every not-yet-unlocked definition against current stats.
    ///
    /// Stats are snapshotted once per pass; an award that pushes
    /// `total_points` over a points-based threshold unlocks that
    /// milestone on the next pass. Points are credited only when the
    /// award row actually landed, so concurrent passes cannot
    /// double-count.
    pub async fn check_achievements(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<AchievementDefinition>> {
        self.stats.ensure_user(user_id).await?;
        let stats = self
            .stats
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::UserStatsNotFound(user_id.to_string()))?;

        let unlocked: HashSet<Uuid> = self
            .achievements
            .list_awards(user_id)
            .await?
            .into_iter()
            .map(|a| a.achievement_id)
            .collect();

        let mut newly_unlocked = Vec::new();
        for definition in self.achievements.list_definitions().await? {
            if unlocked.contains(&definition.id) {
                continue;
            }
            if !definition.criteria.is_satisfied_by(&stats) {
                continue;
            }

            let award = UserAchievement::unlock(user_id, definition.id);
            if self.achievements.try_award(&award).await? {
                self.stats.add_points(user_id, definition.points).await?;
                info!(
                    user_id,
                    achievement = %definition.name,
                    points = definition.points,
                    "achievement unlocked"
                );
                newly_unlocked.push(definition);
            }
        }

        self.update_level(user_id).await?;
        Ok(newly_unlocked)
    }

    /// Recompute the level from the current point total.
    ///
    /// The storage write carries a `level < new` guard, so levels never
    /// regress. Returns the effective level.
    pub async fn update_level(&self, user_id: &str) -> DomainResult<i64> {
        let stats = self
            .stats
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::UserStatsNotFound(user_id.to_string()))?;

        let computed = UserStats::level_for(stats.total_points);
        if self.stats.raise_level(user_id, computed).await? {
            debug!(user_id, level = computed, "level raised");
        }
        Ok(computed.max(stats.level))
    }

    /// Counter trigger for callers on the request path: bookkeeping
    /// failures are logged, never propagated.
    pub async fn track_counters(&self, user_id: &str, deltas: &StatDeltas) {
        if let Err(err) = self.increment_counters(user_id, deltas).await {
            warn!(user_id, error = %err, "progression bookkeeping failed");
        }
    }

    /// Login trigger for callers on the request path: bookkeeping
    /// failures are logged, never propagated.
    pub async fn track_login(&self, user_id: &str) {
        if let Err(err) = self.record_login(user_id).await {
            warn!(user_id, error = %err, "login bookkeeping failed");
        }
    }

    /// A user's stats row, lazily created when absent.
    pub async fn get_user_stats(&self, user_id: &str) -> DomainResult<UserStats> {
        self.stats.ensure_user(user_id).await?;
        self.stats
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::UserStatsNotFound(user_id.to_string()))
    }

    /// A user's awards joined with their definitions.
    pub async fn get_user_achievements(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<UnlockedAchievement>> {
        self.achievements.list_unlocked(user_id).await
    }

    /// Aggregate progression snapshot for one user.
    pub async fn get_user_progress(&self, user_id: &str) -> DomainResult<UserProgress> {
        let stats = self.get_user_stats(user_id).await?;
        let unlocked: Vec<AchievementDefinition> = self
            .achievements
            .list_unlocked(user_id)
            .await?
            .into_iter()
            .map(|u| u.definition)
            .collect();
        #[allow(clippy::cast_possible_truncation)]
        let total = self.achievements.count_definitions().await? as usize;

        Ok(UserProgress::assemble(stats, unlocked, total))
    }

    /// The full catalog grouped by category, in declared category order.
    pub async fn get_achievement_categories(
        &self,
    ) -> DomainResult<Vec<AchievementCategoryGroup>> {
        let mut definitions = self.achievements.list_definitions().await?;

        let mut groups = Vec::new();
        for category in AchievementCategory::all() {
            let (matching, rest): (Vec<_>, Vec<_>) =
                definitions.into_iter().partition(|d| d.category == category);
            definitions = rest;
            groups.push(AchievementCategoryGroup {
                category,
                achievements: matching,
            });
        }
        Ok(groups)
    }

    /// Unlocked-but-unnotified achievements for the notification
    /// collaborator.
    pub async fn pending_notifications(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<UnlockedAchievement>> {
        self.achievements.list_pending_notification(user_id).await
    }

    /// Mark an award as notified. Idempotent.
    pub async fn mark_notified(&self, user_id: &str, achievement_id: Uuid) -> DomainResult<()> {
        self.achievements.mark_notified(user_id, achievement_id).await
    }
}
