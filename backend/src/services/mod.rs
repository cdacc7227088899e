//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod analytics;
pub mod calories;
pub mod rate_limit;

pub use analytics::{AnalyticsService, AnalyticsSink};
pub use calories::CalorieService;
pub use rate_limit::{RegenerationLimiter, StoreFailurePolicy};
