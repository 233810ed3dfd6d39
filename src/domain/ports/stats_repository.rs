//! User stats repository port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{StatDeltas, UserStats};

/// Repository interface for per-user stats rows.
///
/// Counter updates are expressed as storage-level atomic adds, never
/// read-modify-write in application code.
#[async_trait]
pub trait UserStatsRepository: Send + Sync {
    /// Idempotently create a zeroed row for the user.
    async fn ensure_user(&self, user_id: &str) -> DomainResult<()>;

    /// Get a user's stats row.
    async fn get(&self, user_id: &str) -> DomainResult<Option<UserStats>>;

    /// Apply counter deltas atomically (`SET col = col + delta`).
    async fn increment(&self, user_id: &str, deltas: &StatDeltas) -> DomainResult<()>;

    /// Credit points to both point totals atomically.
    async fn add_points(&self, user_id: &str, points: i64) -> DomainResult<()>;

    /// Persist the streak fields from the given stats snapshot.
    async fn update_streak(&self, stats: &UserStats) -> DomainResult<()>;

    /// Raise the stored level to `level` if it is currently lower.
    ///
    /// Returns true when the level actually changed.
    async fn raise_level(&self, user_id: &str, level: i64) -> DomainResult<bool>;
}
