//! Error types for the calorie engine

use crate::validation::ValidationError;
use thiserror::Error;

/// Errors produced while turning a calorie request into a result
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalorieError {
    /// An input field broke its constraint; the first failing check wins
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A goal type outside lose/gain/maintain reached the goal adjustment
    #[error("Invalid goal type: {0}")]
    UnsupportedGoalType(String),
}

impl CalorieError {
    /// Field that caused the failure, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            CalorieError::Validation(err) => Some(&err.field),
            CalorieError::UnsupportedGoalType(_) => Some("goal_type"),
        }
    }
}
