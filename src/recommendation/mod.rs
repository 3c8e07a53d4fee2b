//! Song suggestions from the popular and chart pools.

mod engine;
mod models;
mod sources;

pub use engine::{recommend, RecommendationEngine, RecommendationError};
pub use models::{CandidatePools, CandidateSong, UserActivity};
pub use sources::{is_valid_user_name, RecommendationSources};
