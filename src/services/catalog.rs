//! Static achievement catalog.
//!
//! The catalog is built once at process start and handed to the
//! progression service by value, so tests can inject a fake catalog
//! instead of sharing module-level state.

use crate::domain::models::{
    AchievementCategory, AchievementDefinition, AchievementTier, UnlockCriteria,
};

/// An injected, read-only set of achievement definitions.
#[derive(Debug, Clone)]
pub struct AchievementCatalog {
    definitions: Vec<AchievementDefinition>,
}

impl AchievementCatalog {
    /// Wrap an explicit definition list (used by tests and fakes).
    pub fn new(definitions: Vec<AchievementDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::new(default_definitions())
    }
}

#[allow(clippy::too_many_arguments)]
fn def(
    name: &str,
    title: &str,
    description: &str,
    icon: &str,
    category: AchievementCategory,
    tier: AchievementTier,
    points: i64,
    metric: &str,
    target: i64,
) -> AchievementDefinition {
    AchievementDefinition::new(
        name,
        title,
        category,
        tier,
        points,
        UnlockCriteria::new(metric, target),
    )
    .with_description(description)
    .with_icon(icon)
}

/// The shipped 15-definition catalog.
///
/// `welcome_aboard` and `profile_pro` reference metrics with no trigger
/// path yet; they stay locked until a collaborator starts reporting
/// those metrics.
pub fn default_definitions() -> Vec<AchievementDefinition> {
    use AchievementCategory as C;
    use AchievementTier as T;

    vec![
        // Onboarding
        def(
            "welcome_aboard",
            "Welcome Aboard",
            "Complete the onboarding tour",
            "door-open",
            C::Onboarding,
            T::Bronze,
            10,
            "onboarding_completed",
            1,
        ),
        def(
            "profile_pro",
            "Profile Pro",
            "Fill out your agent profile",
            "id-card",
            C::Onboarding,
            T::Bronze,
            10,
            "profile_completed",
            1,
        ),
        // Clients
        def(
            "first_client",
            "First Client",
            "Add your first client",
            "handshake",
            C::Clients,
            T::Bronze,
            20,
            "clients_added",
            1,
        ),
        def(
            "client_collector",
            "Client Collector",
            "Add five clients",
            "users",
            C::Clients,
            T::Silver,
            50,
            "clients_added",
            5,
        ),
        def(
            "client_magnet",
            "Client Magnet",
            "Add twenty-five clients",
            "magnet",
            C::Clients,
            T::Gold,
            150,
            "clients_added",
            25,
        ),
        // Contracts
        def(
            "first_contract",
            "First Contract",
            "Upload your first representation agreement",
            "file-signature",
            C::Contracts,
            T::Bronze,
            20,
            "contracts_uploaded",
            1,
        ),
        def(
            "paper_trail",
            "Paper Trail",
            "Upload ten contracts",
            "files",
            C::Contracts,
            T::Silver,
            75,
            "contracts_uploaded",
            10,
        ),
        def(
            "breach_buster",
            "Breach Buster",
            "Resolve five commission breaches",
            "gavel",
            C::Contracts,
            T::Gold,
            150,
            "breaches_resolved",
            5,
        ),
        // Milestones
        def(
            "guardian_10k",
            "10K Guardian",
            "Protect $10,000 in commissions",
            "shield",
            C::Milestones,
            T::Silver,
            100,
            "commission_protected",
            10_000,
        ),
        def(
            "guardian_100k",
            "100K Guardian",
            "Protect $100,000 in commissions",
            "shield-star",
            C::Milestones,
            T::Gold,
            250,
            "commission_protected",
            100_000,
        ),
        def(
            "thousand_club",
            "Thousand Point Club",
            "Earn 1,000 achievement points",
            "trophy",
            C::Milestones,
            T::Platinum,
            500,
            "total_points",
            1_000,
        ),
        // Engagement
        def(
            "showtime",
            "Showtime",
            "Schedule your first showing",
            "calendar",
            C::Engagement,
            T::Bronze,
            15,
            "showings_scheduled",
            1,
        ),
        def(
            "streak_starter",
            "Streak Starter",
            "Log in three days in a row",
            "flame",
            C::Engagement,
            T::Bronze,
            25,
            "login_streak",
            3,
        ),
        def(
            "streak_master",
            "Streak Master",
            "Log in seven days in a row",
            "fire",
            C::Engagement,
            T::Silver,
            75,
            "login_streak",
            7,
        ),
        def(
            "alert_responder",
            "Alert Responder",
            "Action ten commission alerts",
            "bell",
            C::Engagement,
            T::Silver,
            50,
            "alerts_actioned",
            10,
        ),
    ]
}
