//! Business logic services for the laurel progression engine.

pub mod catalog;
pub mod progression_service;

pub use catalog::{default_definitions, AchievementCatalog};
pub use progression_service::ProgressionService;
