//! Achievement definition domain model.
//!
//! Definitions form a static catalog: they are loaded once at startup,
//! seeded into storage insert-if-absent, and never mutated at runtime.
//! Catalog changes are deploy-time changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user_stats::UserStats;

/// Display grouping for achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Onboarding,
    Clients,
    Contracts,
    Milestones,
    Engagement,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Clients => "clients",
            Self::Contracts => "contracts",
            Self::Milestones => "milestones",
            Self::Engagement => "engagement",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "onboarding" => Some(Self::Onboarding),
            "clients" => Some(Self::Clients),
            "contracts" => Some(Self::Contracts),
            "milestones" => Some(Self::Milestones),
            "engagement" => Some(Self::Engagement),
            _ => None,
        }
    }

    /// All categories in display order.
    pub fn all() -> [Self; 5] {
        [
            Self::Onboarding,
            Self::Clients,
            Self::Contracts,
            Self::Milestones,
            Self::Engagement,
        ]
    }
}

/// Cosmetic rank attached to an achievement. Does not affect unlock logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl AchievementTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

/// Threshold criterion an achievement is evaluated against.
///
/// `metric` names a counter or derived value on [`UserStats`]. Metrics
/// without a registry entry (forward-declared ones such as
/// `profile_completed`) are treated as not yet satisfiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockCriteria {
    /// Metric name resolved through the stats metric registry.
    pub metric: String,
    /// Threshold the metric must reach (inclusive).
    pub target: i64,
    /// Optional timeframe qualifier. Carried as data, not evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
}

impl UnlockCriteria {
    pub fn new(metric: impl Into<String>, target: i64) -> Self {
        Self {
            metric: metric.into(),
            target,
            timeframe: None,
        }
    }

    /// Evaluate this criterion against the given stats snapshot.
    ///
    /// Unknown metrics never satisfy.
    pub fn is_satisfied_by(&self, stats: &UserStats) -> bool {
        stats
            .metric_value(&self.metric)
            .is_some_and(|value| value >= self.target)
    }
}

/// Immutable catalog entry describing one unlockable achievement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique identifier (storage-assigned on first seed).
    pub id: Uuid,
    /// Unique key, stable across deploys (e.g. `first_client`).
    pub name: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Icon identifier for the UI.
    pub icon: String,
    /// Display grouping.
    pub category: AchievementCategory,
    /// Cosmetic rank.
    pub tier: AchievementTier,
    /// Points credited on unlock.
    pub points: i64,
    /// Unlock criterion.
    pub criteria: UnlockCriteria,
    /// When this definition was first seeded.
    pub created_at: DateTime<Utc>,
}

impl AchievementDefinition {
    /// Create a new definition with a fresh id.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        category: AchievementCategory,
        tier: AchievementTier,
        points: i64,
        criteria: UnlockCriteria,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            title: title.into(),
            description: String::new(),
            icon: String::new(),
            category,
            tier,
            points,
            criteria,
            created_at: Utc::now(),
        }
    }

    /// Set the display description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the icon identifier.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Validate this definition.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Achievement name cannot be empty".to_string());
        }
        if self.points < 0 {
            return Err("Achievement points cannot be negative".to_string());
        }
        if self.criteria.target < 0 {
            return Err("Criteria target cannot be negative".to_string());
        }
        Ok(())
    }
}
