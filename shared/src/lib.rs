//! Coach Shared Library
//!
//! This crate contains the calorie engine plus the shared types, models and
//! validation used by the backend and WASM modules.

pub mod calories;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use calories::{calculate_calories, ActivityLevel, CalorieInputs, Gender, GoalType};
pub use errors::CalorieError;
pub use lifecycle::{AppLifecycle, AppState};
pub use models::{AnalyticsEvent, AppOpenSource, PlanType};
pub use types::*;
pub use validation::ValidationError;
