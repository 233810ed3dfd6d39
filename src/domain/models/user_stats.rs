//! Per-user progression stats.
//!
//! One row per user: additive counters bumped by collaborator triggers,
//! login-streak state, and derived point/level totals. Rows are created
//! lazily on first reference and never deleted in normal operation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Points required per level. `level = total_points / POINTS_PER_LEVEL + 1`.
pub const POINTS_PER_LEVEL: i64 = 100;

/// Accessor used by the metric registry to read one stat off a snapshot.
pub type MetricFn = fn(&UserStats) -> i64;

/// Metric registry: maps criterion metric names to stat accessors.
///
/// Metrics absent from this table (e.g. the forward-declared
/// `profile_completed` and `onboarding_completed`) are not yet
/// satisfiable and evaluate to `None`.
static METRICS: &[(&str, MetricFn)] = &[
    ("clients_added", |s| s.clients_added),
    ("contracts_uploaded", |s| s.contracts_uploaded),
    ("showings_scheduled", |s| s.showings_scheduled),
    ("breaches_resolved", |s| s.breaches_resolved),
    ("commission_protected", |s| s.commission_protected),
    ("alerts_actioned", |s| s.alerts_actioned),
    ("login_streak", |s| s.consecutive_login_days),
    ("days_active", |s| s.days_active),
    ("total_points", |s| s.total_points),
];

/// Outcome of applying a login event to the streak state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginTransition {
    /// No prior login recorded; streak starts at 1.
    First,
    /// Prior login was exactly one calendar day earlier; streak extends.
    Continued,
    /// Prior login was today; nothing changes.
    SameDay,
    /// Prior login was more than one day ago; streak resets to 1.
    Reset,
}

impl LoginTransition {
    /// Whether this transition mutated the streak state.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::SameDay)
    }
}

/// Mutable per-user stats row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Opaque user id owned by the host platform.
    pub user_id: String,
    pub clients_added: i64,
    pub contracts_uploaded: i64,
    pub showings_scheduled: i64,
    pub breaches_resolved: i64,
    pub commission_protected: i64,
    pub alerts_actioned: i64,
    /// Consecutive calendar days with at least one login.
    pub consecutive_login_days: i64,
    /// Historical maximum streak.
    pub longest_streak: i64,
    /// Calendar date of the most recent login.
    pub last_login_date: Option<NaiveDate>,
    /// Distinct days with at least one login.
    pub days_active: i64,
    /// Sum of points over all unlocked achievements.
    pub total_points: i64,
    /// Credited identically to `total_points` on every award.
    pub experience_points: i64,
    /// Derived level; monotonically non-decreasing.
    pub level: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    /// Create a zeroed stats row for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            clients_added: 0,
            contracts_uploaded: 0,
            showings_scheduled: 0,
            breaches_resolved: 0,
            commission_protected: 0,
            alerts_actioned: 0,
            consecutive_login_days: 0,
            longest_streak: 0,
            last_login_date: None,
            days_active: 0,
            total_points: 0,
            experience_points: 0,
            level: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Resolve a metric name to its current value via the metric registry.
    pub fn metric_value(&self, metric: &str) -> Option<i64> {
        METRICS
            .iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, accessor)| accessor(self))
    }

    /// Level derived from a point total.
    pub fn level_for(total_points: i64) -> i64 {
        total_points.max(0) / POINTS_PER_LEVEL + 1
    }

    /// Apply a login event for the given calendar day.
    ///
    /// Repeated calls for the same day are a no-op. `days_active` only
    /// moves on an actual state change.
    pub fn apply_login(&mut self, today: NaiveDate) -> LoginTransition {
        let transition = match self.last_login_date {
            None => LoginTransition::First,
            Some(last) if last == today => return LoginTransition::SameDay,
            Some(last) if (today - last).num_days() == 1 => LoginTransition::Continued,
            Some(_) => LoginTransition::Reset,
        };

        self.consecutive_login_days = match transition {
            LoginTransition::Continued => self.consecutive_login_days + 1,
            _ => 1,
        };
        self.longest_streak = self.longest_streak.max(self.consecutive_login_days);
        self.last_login_date = Some(today);
        self.days_active += 1;
        self.updated_at = Utc::now();

        transition
    }
}

/// Named, non-negative counter deltas applied in one atomic update.
///
/// Zero fields leave the stored counter unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDeltas {
    #[serde(default)]
    pub clients_added: i64,
    #[serde(default)]
    pub contracts_uploaded: i64,
    #[serde(default)]
    pub showings_scheduled: i64,
    #[serde(default)]
    pub breaches_resolved: i64,
    #[serde(default)]
    pub commission_protected: i64,
    #[serde(default)]
    pub alerts_actioned: i64,
}

impl StatDeltas {
    pub fn clients_added(mut self, delta: i64) -> Self {
        self.clients_added = delta;
        self
    }

    pub fn contracts_uploaded(mut self, delta: i64) -> Self {
        self.contracts_uploaded = delta;
        self
    }

    pub fn showings_scheduled(mut self, delta: i64) -> Self {
        self.showings_scheduled = delta;
        self
    }

    pub fn breaches_resolved(mut self, delta: i64) -> Self {
        self.breaches_resolved = delta;
        self
    }

    pub fn commission_protected(mut self, delta: i64) -> Self {
        self.commission_protected = delta;
        self
    }

    pub fn alerts_actioned(mut self, delta: i64) -> Self {
        self.alerts_actioned = delta;
        self
    }

    /// True when every field is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate that no delta is negative. Counters only move forward.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("clients_added", self.clients_added),
            ("contracts_uploaded", self.contracts_uploaded),
            ("showings_scheduled", self.showings_scheduled),
            ("breaches_resolved", self.breaches_resolved),
            ("commission_protected", self.commission_protected),
            ("alerts_actioned", self.alerts_actioned),
        ];
        for (name, delta) in fields {
            if delta < 0 {
                return Err(format!("Delta for {name} cannot be negative: {delta}"));
            }
        }
        Ok(())
    }
}
