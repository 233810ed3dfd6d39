//! Laurel - Achievement & Progression Engine
//!
//! Laurel is the gamification subsystem of a real-estate commission
//! protection platform. It tracks per-user counters, evaluates
//! threshold-based unlock criteria over them, awards points, and derives
//! a level from the accumulated total. It is an in-process library:
//! collaborators on the web request layer call in when business events
//! happen (client added, contract uploaded, login) and read aggregates
//! back out for UI and notifications.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain Layer** (`domain`): models, errors, and repository ports
//! - **Service Layer** (`services`): the progression engine and catalog
//! - **Adapters** (`adapters`): SQLite implementations of the ports
//! - **Infrastructure** (`infrastructure`): configuration and logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use laurel::adapters::sqlite::{
//!     initialize_database, SqliteAchievementRepository, SqliteUserStatsRepository,
//! };
//! use laurel::domain::models::StatDeltas;
//! use laurel::infrastructure::config::ConfigLoader;
//! use laurel::services::{AchievementCatalog, ProgressionService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database).await?;
//!
//!     let engine = ProgressionService::new(
//!         Arc::new(SqliteUserStatsRepository::new(pool.clone())),
//!         Arc::new(SqliteAchievementRepository::new(pool)),
//!         AchievementCatalog::default(),
//!     );
//!     engine.seed_catalog().await?;
//!
//!     // A collaborator just created a client for this user.
//!     engine
//!         .track_counters("user-1", &StatDeltas::default().clients_added(1))
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    AchievementCategory, AchievementCategoryGroup, AchievementDefinition, AchievementTier,
    Config, DatabaseConfig, LoggingConfig, StatDeltas, UnlockCriteria, UnlockedAchievement,
    UserAchievement, UserProgress, UserStats,
};
pub use domain::ports::{AchievementRepository, UserStatsRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AchievementCatalog, ProgressionService};
