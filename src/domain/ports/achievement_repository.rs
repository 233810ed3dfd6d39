//! Achievement catalog and award repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AchievementDefinition, UnlockedAchievement, UserAchievement};

/// Repository interface for achievement definitions and per-user awards.
#[async_trait]
pub trait AchievementRepository: Send + Sync {
    /// Insert a definition if no row with the same `name` exists.
    ///
    /// Returns true when a row was actually inserted.
    async fn insert_definition_if_absent(
        &self,
        definition: &AchievementDefinition,
    ) -> DomainResult<bool>;

    /// Get a definition by its unique name.
    async fn get_definition_by_name(
        &self,
        name: &str,
    ) -> DomainResult<Option<AchievementDefinition>>;

    /// List the full catalog.
    async fn list_definitions(&self) -> DomainResult<Vec<AchievementDefinition>>;

    /// Count catalog entries.
    async fn count_definitions(&self) -> DomainResult<u64>;

    /// Record an award. A duplicate (user, achievement) pair is a no-op.
    ///
    /// Returns true when the row was actually inserted, false when the
    /// user had already unlocked this achievement.
    async fn try_award(&self, award: &UserAchievement) -> DomainResult<bool>;

    /// List a user's awards.
    async fn list_awards(&self, user_id: &str) -> DomainResult<Vec<UserAchievement>>;

    /// List a user's awards joined with their definitions.
    async fn list_unlocked(&self, user_id: &str) -> DomainResult<Vec<UnlockedAchievement>>;

    /// List unlocked-but-unnotified awards with their definitions.
    async fn list_pending_notification(
        &self,
        user_id: &str,
    ) -> DomainResult<Vec<UnlockedAchievement>>;

    /// Flip the notified flag on an award. Idempotent.
    async fn mark_notified(&self, user_id: &str, achievement_id: Uuid) -> DomainResult<()>;
}
