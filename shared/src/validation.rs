//! Input validation functions
//!
//! Every validator returns the first problem it finds as a [`ValidationError`]
//! carrying the offending field, so callers can chain them with `?` and stop
//! at the first failure.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

/// Age bounds in whole years (inclusive)
pub const MIN_AGE_YEARS: i32 = 1;
pub const MAX_AGE_YEARS: i32 = 150;

/// Upper bounds for body measurements (lower bound is exclusive zero)
pub const MAX_HEIGHT_CM: f64 = 300.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;

/// Longest analytics event name accepted by the collector
pub const MAX_EVENT_NAME_LEN: usize = 40;

static EVENT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("event name pattern is valid")
});

// ============================================================================
// Errors
// ============================================================================

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{display_label}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "age" => "Age",
        "gender" => "Gender",
        "height_cm" => "Height",
        "weight_kg" => "Current Weight",
        "goal_weight_kg" => "Goal Weight",
        "activity_level" => "Activity Level",
        "goal_type" => "Goal Type",
        "goal_timeframe_weeks" => "Goal Timeframe",
        "name" => "Event Name",
        _ => field_name,
    }
}

// ============================================================================
// Biometric Validation
// ============================================================================

/// Checks `0 < value <= max`; NaN and infinities never pass.
fn validate_positive_at_most(field: &str, value: f64, max: f64, unit: &str) -> Result<(), ValidationError> {
    if value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            &format!("must be greater than 0 and at most {} {}", max, unit),
        ))
    }
}

/// Validate age in whole years (1-150 inclusive)
pub fn validate_age(age: i32) -> Result<(), ValidationError> {
    if (MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "age",
            &format!("must be between {} and {} years", MIN_AGE_YEARS, MAX_AGE_YEARS),
        ))
    }
}

/// Validate height value (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), ValidationError> {
    validate_positive_at_most("height_cm", height_cm, MAX_HEIGHT_CM, "cm")
}

/// Validate current weight (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), ValidationError> {
    validate_positive_at_most("weight_kg", weight_kg, MAX_WEIGHT_KG, "kg")
}

/// Validate goal weight (in kg)
pub fn validate_goal_weight_kg(goal_weight_kg: f64) -> Result<(), ValidationError> {
    validate_positive_at_most("goal_weight_kg", goal_weight_kg, MAX_WEIGHT_KG, "kg")
}

/// Validate goal timeframe, which only has to be a positive number of weeks
pub fn validate_goal_timeframe_weeks(weeks: f64) -> Result<(), ValidationError> {
    if weeks > 0.0 && weeks.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new(
            "goal_timeframe_weeks",
            "must be greater than 0 weeks",
        ))
    }
}

// ============================================================================
// Analytics Validation
// ============================================================================

/// Validate an analytics event name: a letter followed by letters, digits or
/// underscores, at most 40 characters.
pub fn validate_event_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("name", "cannot be empty"));
    }
    if name.len() > MAX_EVENT_NAME_LEN {
        return Err(ValidationError::new(
            "name",
            &format!("must be at most {} characters", MAX_EVENT_NAME_LEN),
        ));
    }
    if !EVENT_NAME_REGEX.is_match(name) {
        return Err(ValidationError::new(
            "name",
            "must start with a letter and contain only letters, digits and underscores",
        ));
    }
    Ok(())
}
