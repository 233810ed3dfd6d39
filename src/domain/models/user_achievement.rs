//! Unlocked-achievement join entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records that a user has unlocked an achievement.
///
/// Created exactly once per (user, achievement) pair; the storage layer
/// enforces uniqueness as the authoritative guard against double-award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAchievement {
    pub id: Uuid,
    pub user_id: String,
    pub achievement_id: Uuid,
    /// Always true for threshold unlocks; carried for partial-progress
    /// award types the host product may add.
    pub completed: bool,
    /// Whether the notification collaborator has picked this up.
    pub notified: bool,
    pub unlocked_at: DateTime<Utc>,
}

impl UserAchievement {
    /// Create a completed, notification-pending unlock record.
    pub fn unlock(user_id: impl Into<String>, achievement_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            achievement_id,
            completed: true,
            notified: false,
            unlocked_at: Utc::now(),
        }
    }
}
