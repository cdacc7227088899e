//! Calorie calculation service
//!
//! Wraps the shared calorie engine with logging and metrics.

use crate::error::ApiError;
use coach_shared::{calculate_calories, CalorieOutputs, CalorieRequest};
use tracing::{debug, info};

/// Calorie service for business logic
pub struct CalorieService;

impl CalorieService {
    /// Validate the request and compute BMR, TDEE and the daily target
    pub fn calculate(request: &CalorieRequest) -> Result<CalorieOutputs, ApiError> {
        match calculate_calories(request) {
            Ok(outputs) => {
                metrics::counter!("calorie_calculations_total", "outcome" => "ok").increment(1);
                if outputs.activity_capped {
                    info!(
                        activity_level = %request.activity_level,
                        "Activity level capped for calorie target"
                    );
                }
                debug!(
                    bmr = outputs.bmr,
                    tdee = outputs.tdee,
                    target = outputs.target_calories,
                    goal_type = %request.goal_type,
                    "Calories calculated"
                );
                Ok(outputs)
            }
            Err(err) => {
                metrics::counter!("calorie_calculations_total", "outcome" => "rejected")
                    .increment(1);
                debug!(field = ?err.field(), error = %err, "Calorie request rejected");
                Err(err.into())
            }
        }
    }
}
