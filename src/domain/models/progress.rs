//! Read-only aggregates served to UI and notification collaborators.

use serde::{Deserialize, Serialize};

use super::achievement::{AchievementCategory, AchievementDefinition};
use super::user_achievement::UserAchievement;
use super::user_stats::{UserStats, POINTS_PER_LEVEL};

/// A user's unlocked achievement joined with its definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub award: UserAchievement,
    pub definition: AchievementDefinition,
}

/// Aggregate progression snapshot for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub stats: UserStats,
    /// Definitions the user has unlocked.
    pub unlocked: Vec<AchievementDefinition>,
    /// Total catalog size.
    pub total_achievements: usize,
    /// `unlocked / total * 100`, rounded to the nearest whole percent.
    pub completion_percentage: u32,
    pub level: i64,
    pub total_points: i64,
    /// Point total at which the next level is reached (`level * 100`).
    pub next_level_points: i64,
}

impl UserProgress {
    /// Assemble the aggregate from its parts.
    pub fn assemble(
        stats: UserStats,
        unlocked: Vec<AchievementDefinition>,
        total_achievements: usize,
    ) -> Self {
        let completion_percentage = if total_achievements == 0 {
            0
        } else {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let pct = (unlocked.len() as f64 / total_achievements as f64 * 100.0).round() as u32;
            pct
        };

        Self {
            level: stats.level,
            total_points: stats.total_points,
            next_level_points: stats.level * POINTS_PER_LEVEL,
            unlocked,
            total_achievements,
            completion_percentage,
            stats,
        }
    }
}

/// One category's slice of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementCategoryGroup {
    pub category: AchievementCategory,
    pub achievements: Vec<AchievementDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::achievement::{AchievementTier, UnlockCriteria};

    fn definition(name: &str) -> AchievementDefinition {
        AchievementDefinition::new(
            name,
            name,
            AchievementCategory::Clients,
            AchievementTier::Bronze,
            20,
            UnlockCriteria::new("clients_added", 1),
        )
    }

    #[test]
    fn test_completion_percentage_rounds() {
        let mut stats = UserStats::new("user-1");
        stats.total_points = 70;

        let progress = UserProgress::assemble(
            stats,
            vec![definition("a"), definition("b")],
            15,
        );

        // 2 of 15 = 13.33%, rounds to 13
        assert_eq!(progress.completion_percentage, 13);
        assert_eq!(progress.total_achievements, 15);
        assert_eq!(progress.next_level_points, 100);
    }

    #[test]
    fn test_empty_catalog_is_zero_percent() {
        let progress = UserProgress::assemble(UserStats::new("user-1"), vec![], 0);
        assert_eq!(progress.completion_percentage, 0);
    }
}
