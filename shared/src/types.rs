//! API request and response types

use crate::calories::Gender;
use crate::models::PlanType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Calories
// ============================================================================

/// Calorie calculation request as it arrives on the wire
///
/// Activity level and goal type stay as raw strings here; they are parsed
/// during validation so that checks fail in a fixed field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieRequest {
    #[serde(deserialize_with = "whole_years")]
    pub age: i32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub goal_weight_kg: f64,
    pub activity_level: String,
    pub goal_type: String,
    pub goal_timeframe_weeks: f64,
}

/// Accepts `30` and `30.0`; a fractional age is a type error
///
/// Whole values beyond `i32` saturate so the range check reports them.
fn whole_years<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!(
            "age must be a whole number of years, got {}",
            value
        )));
    }
    Ok(value as i32)
}

/// Calorie calculation result, in kcal/day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieOutputs {
    pub bmr: i64,
    pub tdee: i64,
    pub target_calories: i64,
    pub activity_capped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_capped_message: Option<String>,
}

// ============================================================================
// Plan Regeneration
// ============================================================================

/// Request to check or record a plan regeneration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationRequest {
    pub user_id: Uuid,
    pub plan_type: PlanType,
}

/// Whether a user may regenerate a plan right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationStatus {
    pub can_regenerate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_remaining: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RegenerationStatus {
    /// Regeneration is allowed with nothing further to report
    pub fn allowed() -> Self {
        Self {
            can_regenerate: true,
            next_available_at: None,
            hours_remaining: None,
            message: None,
        }
    }
}

// ============================================================================
// Analytics
// ============================================================================

/// Client-submitted analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalyticsEventRequest {
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 25))]
    pub params: HashMap<String, serde_json::Value>,
}
