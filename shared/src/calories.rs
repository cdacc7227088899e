//! Calorie engine
//!
//! Turns biometric and goal inputs into a Basal Metabolic Rate (BMR), Total
//! Daily Energy Expenditure (TDEE) and a goal-adjusted daily calorie target.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: no hidden state, identical inputs give identical outputs
//! 2. **Closed Enumerations**: activity level and goal type are parsed once, then
//!    every formula matches on variants
//! 3. **Round Last**: raw BMR feeds TDEE and raw TDEE feeds the target; only the
//!    reported values are rounded

use crate::errors::CalorieError;
use crate::types::{CalorieOutputs, CalorieRequest};
use crate::validation::{
    validate_age, validate_goal_timeframe_weeks, validate_goal_weight_kg, validate_height_cm,
    validate_weight_kg, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multiplier every activity level above "Moderately active" is held to
pub const ACTIVITY_CAP_MULTIPLIER: f64 = 1.55;

/// Largest deficit the lose branch may ever apply (kcal/day)
pub const LOSE_MAX_DEFICIT_KCAL: f64 = 800.0;

/// Deficit the lose branch aims for (kcal/day)
pub const LOSE_TARGET_DEFICIT_KCAL: f64 = 450.0;

/// Fixed surplus for the gain branch (kcal/day)
pub const GAIN_SURPLUS_KCAL: f64 = 350.0;

/// Shown to the user whenever their activity level was capped
pub const ACTIVITY_CAPPED_MESSAGE: &str = "Your activity level has been capped at \"Moderately active\" \
     so your calorie target does not overestimate your daily energy needs.";

// ============================================================================
// Input Enumerations
// ============================================================================

/// Gender used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Self-reported activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Sedentary")]
    Sedentary,
    #[serde(rename = "Lightly active")]
    LightlyActive,
    #[serde(rename = "Moderately active")]
    ModeratelyActive,
    #[serde(rename = "Very active")]
    VeryActive,
    #[serde(rename = "Super active")]
    SuperActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::SuperActive,
    ];

    /// The exact key clients send
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly active",
            ActivityLevel::ModeratelyActive => "Moderately active",
            ActivityLevel::VeryActive => "Very active",
            ActivityLevel::SuperActive => "Super active",
        }
    }

    /// Get the activity multiplier for TDEE calculation
    ///
    /// The two highest tiers share the "Moderately active" factor.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive | ActivityLevel::SuperActive => ACTIVITY_CAP_MULTIPLIER,
        }
    }

    /// Whether this level is held down to the capped multiplier
    pub fn is_capped(&self) -> bool {
        matches!(self, ActivityLevel::VeryActive | ActivityLevel::SuperActive)
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = ValidationError;

    /// Keys are matched exactly, including case and spacing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = ActivityLevel::ALL.iter().map(|l| l.as_str()).collect();
                ValidationError::new(
                    "activity_level",
                    &format!("must be one of: {}", allowed.join(", ")),
                )
            })
    }
}

/// What the user wants to do with their weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    Gain,
    Maintain,
}

impl GoalType {
    pub const ALL: [GoalType; 3] = [GoalType::Lose, GoalType::Gain, GoalType::Maintain];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Lose => "lose",
            GoalType::Gain => "gain",
            GoalType::Maintain => "maintain",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = CalorieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalType::ALL
            .into_iter()
            .find(|goal| goal.as_str() == s)
            .ok_or_else(|| CalorieError::UnsupportedGoalType(s.to_string()))
    }
}

// ============================================================================
// Validated Inputs
// ============================================================================

/// A calorie request whose every field passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieInputs {
    pub age: i32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Collected by the client, not used by any formula
    pub goal_weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    /// Collected by the client, not used by any formula
    pub goal_timeframe_weeks: f64,
}

/// Validate a request, stopping at the first failing field
///
/// Order: age, height, weight, goal weight, activity level, goal type,
/// goal timeframe. The request is only read, never modified.
pub fn validate(request: &CalorieRequest) -> Result<CalorieInputs, CalorieError> {
    validate_age(request.age)?;
    validate_height_cm(request.height_cm)?;
    validate_weight_kg(request.weight_kg)?;
    validate_goal_weight_kg(request.goal_weight_kg)?;
    let activity_level: ActivityLevel = request.activity_level.parse()?;
    let goal_type: GoalType = request.goal_type.parse().map_err(|_| {
        let allowed: Vec<&str> = GoalType::ALL.iter().map(|g| g.as_str()).collect();
        ValidationError::new("goal_type", &format!("must be one of: {}", allowed.join(", ")))
    })?;
    validate_goal_timeframe_weeks(request.goal_timeframe_weeks)?;

    Ok(CalorieInputs {
        age: request.age,
        gender: request.gender,
        height_cm: request.height_cm,
        weight_kg: request.weight_kg,
        goal_weight_kg: request.goal_weight_kg,
        activity_level,
        goal_type,
        goal_timeframe_weeks: request.goal_timeframe_weeks,
    })
}

// ============================================================================
// Formulas
// ============================================================================

/// Calculate BMR using the revised Harris-Benedict equation
///
/// Men: BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn compute_bmr(age: i32, gender: Gender, height_cm: f64, weight_kg: f64) -> f64 {
    let age = f64::from(age);
    match gender {
        Gender::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Gender::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    }
}

/// TDEE = BMR × activity multiplier
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Apply the goal adjustment to a TDEE
pub fn compute_target_calories(tdee: f64, goal_type: GoalType) -> f64 {
    match goal_type {
        // The larger of the two bounds wins, so the deficit never exceeds the
        // target deficit. With current constants this is always tdee - 450.
        GoalType::Lose => (tdee - LOSE_MAX_DEFICIT_KCAL).max(tdee - LOSE_TARGET_DEFICIT_KCAL),
        GoalType::Gain => tdee + GAIN_SURPLUS_KCAL,
        GoalType::Maintain => tdee,
    }
}

/// Round to the nearest multiple of 10, with exact halves going up
///
/// `1845.0 -> 1850`, `1844.9 -> 1840`, `-15.0 -> -10`.
pub fn round_to_nearest_10(value: f64) -> i64 {
    let quotient = value / 10.0;
    let floor = quotient.floor();
    let rounded = if quotient - floor >= 0.5 { floor + 1.0 } else { floor };
    (rounded * 10.0) as i64
}

// ============================================================================
// Orchestration
// ============================================================================

/// Validate a request and compute the rounded calorie figures
pub fn calculate_calories(request: &CalorieRequest) -> Result<CalorieOutputs, CalorieError> {
    let inputs = validate(request)?;
    Ok(calculate_for_inputs(&inputs))
}

/// Compute the rounded calorie figures for already-validated inputs
pub fn calculate_for_inputs(inputs: &CalorieInputs) -> CalorieOutputs {
    let activity_capped = inputs.activity_level.is_capped();

    let bmr = compute_bmr(inputs.age, inputs.gender, inputs.height_cm, inputs.weight_kg);
    let tdee = compute_tdee(bmr, inputs.activity_level);
    let target = compute_target_calories(tdee, inputs.goal_type);

    CalorieOutputs {
        bmr: round_to_nearest_10(bmr),
        tdee: round_to_nearest_10(tdee),
        target_calories: round_to_nearest_10(target),
        activity_capped,
        activity_capped_message: activity_capped.then(|| ACTIVITY_CAPPED_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn scenario_a() -> CalorieRequest {
        CalorieRequest {
            age: 30,
            gender: Gender::Male,
            height_cm: 180.0,
            weight_kg: 80.0,
            goal_weight_kg: 75.0,
            activity_level: "Moderately active".to_string(),
            goal_type: "lose".to_string(),
            goal_timeframe_weeks: 8.0,
        }
    }

    // =========================================================================
    // Formula Tests
    // =========================================================================

    #[test]
    fn test_bmr_harris_benedict() {
        let bmr = compute_bmr(30, Gender::Male, 180.0, 80.0);
        assert!((bmr - 1853.632).abs() < 1e-9);

        let bmr = compute_bmr(30, Gender::Female, 165.0, 60.0);
        assert!((bmr - 1383.683).abs() < 1e-9);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 1.2)]
    #[case(ActivityLevel::LightlyActive, 1.375)]
    #[case(ActivityLevel::ModeratelyActive, 1.55)]
    #[case(ActivityLevel::VeryActive, 1.55)]
    #[case(ActivityLevel::SuperActive, 1.55)]
    fn test_activity_multipliers(#[case] level: ActivityLevel, #[case] expected: f64) {
        assert_eq!(level.multiplier(), expected);
        assert_eq!(compute_tdee(1000.0, level), 1000.0 * expected);
    }

    #[test]
    fn test_target_calories_per_goal() {
        assert_eq!(compute_target_calories(2500.0, GoalType::Lose), 2050.0);
        assert_eq!(compute_target_calories(2500.0, GoalType::Gain), 2850.0);
        assert_eq!(compute_target_calories(2500.0, GoalType::Maintain), 2500.0);
    }

    #[rstest]
    #[case(1845.0, 1850)] // half goes up, banker's rounding would give 1840
    #[case(25.0, 30)]
    #[case(1855.0, 1860)]
    #[case(1844.9, 1840)]
    #[case(1853.632, 1850)]
    #[case(2873.1296, 2870)]
    #[case(0.0, 0)]
    #[case(-15.0, -10)]
    #[case(-16.0, -20)]
    fn test_round_to_nearest_10(#[case] value: f64, #[case] expected: i64) {
        assert_eq!(round_to_nearest_10(value), expected);
    }

    // =========================================================================
    // Parsing Tests
    // =========================================================================

    #[test]
    fn test_activity_level_keys_are_exact() {
        assert_eq!("Super active".parse::<ActivityLevel>().unwrap(), ActivityLevel::SuperActive);
        assert!("super active".parse::<ActivityLevel>().is_err());
        assert!("Extremely active".parse::<ActivityLevel>().is_err());
    }

    #[test]
    fn test_unknown_goal_type_is_unsupported() {
        let err = "bulk".parse::<GoalType>().unwrap_err();
        assert_eq!(err, CalorieError::UnsupportedGoalType("bulk".to_string()));
        assert_eq!(err.to_string(), "Invalid goal type: bulk");
    }

    // =========================================================================
    // Scenario Tests
    // =========================================================================

    #[test]
    fn test_scenario_a_moderately_active_lose() {
        let result = calculate_calories(&scenario_a()).unwrap();
        assert_eq!(result.bmr, 1850);
        assert_eq!(result.tdee, 2870);
        assert_eq!(result.target_calories, 2420);
        assert!(!result.activity_capped);
        assert!(result.activity_capped_message.is_none());
    }

    #[test]
    fn test_scenario_b_super_active_is_capped() {
        let moderate = calculate_calories(&scenario_a()).unwrap();
        let request = CalorieRequest {
            activity_level: "Super active".to_string(),
            ..scenario_a()
        };
        let result = calculate_calories(&request).unwrap();

        assert!(result.activity_capped);
        assert_eq!(result.activity_capped_message.as_deref(), Some(ACTIVITY_CAPPED_MESSAGE));
        assert_eq!(result.bmr, moderate.bmr);
        assert_eq!(result.tdee, moderate.tdee);
        assert_eq!(result.target_calories, moderate.target_calories);
    }

    #[test]
    fn test_scenario_c_maintain_matches_tdee() {
        let request = CalorieRequest {
            goal_type: "maintain".to_string(),
            ..scenario_a()
        };
        let result = calculate_calories(&request).unwrap();
        assert_eq!(result.target_calories, result.tdee);
    }

    #[test]
    fn test_gain_adds_fixed_surplus() {
        let request = CalorieRequest {
            goal_type: "gain".to_string(),
            goal_timeframe_weeks: 52.0,
            ..scenario_a()
        };
        let result = calculate_calories(&request).unwrap();
        assert_eq!(result.target_calories, 3220);
    }

    #[test]
    fn test_scenario_d_age_over_limit_is_rejected() {
        let request = CalorieRequest { age: 151, ..scenario_a() };
        let err = calculate_calories(&request).unwrap_err();
        assert_eq!(err.field(), Some("age"));
    }

    // =========================================================================
    // Validation Order Tests
    // =========================================================================

    #[test]
    fn test_validation_stops_at_first_failure() {
        let request = CalorieRequest {
            age: 0,
            height_cm: 400.0,
            activity_level: "Couch".to_string(),
            ..scenario_a()
        };
        assert_eq!(validate(&request).unwrap_err().field(), Some("age"));

        let request = CalorieRequest {
            goal_weight_kg: 0.0,
            activity_level: "Couch".to_string(),
            ..scenario_a()
        };
        assert_eq!(validate(&request).unwrap_err().field(), Some("goal_weight_kg"));

        let request = CalorieRequest {
            activity_level: "Couch".to_string(),
            goal_type: "bulk".to_string(),
            ..scenario_a()
        };
        assert_eq!(validate(&request).unwrap_err().field(), Some("activity_level"));

        let request = CalorieRequest {
            goal_type: "bulk".to_string(),
            goal_timeframe_weeks: 0.0,
            ..scenario_a()
        };
        let err = validate(&request).unwrap_err();
        assert!(matches!(err, CalorieError::Validation(_)));
        assert_eq!(err.field(), Some("goal_type"));

        let request = CalorieRequest { goal_timeframe_weeks: 0.0, ..scenario_a() };
        assert_eq!(validate(&request).unwrap_err().field(), Some("goal_timeframe_weeks"));
    }

    #[rstest]
    #[case(150, true)]
    #[case(151, false)]
    #[case(0, false)]
    fn test_age_boundaries(#[case] age: i32, #[case] ok: bool) {
        let request = CalorieRequest { age, ..scenario_a() };
        assert_eq!(calculate_calories(&request).is_ok(), ok);
    }

    #[rstest]
    #[case(300.0, 80.0, true)]
    #[case(301.0, 80.0, false)]
    #[case(180.0, 500.0, true)]
    #[case(180.0, 501.0, false)]
    fn test_height_weight_boundaries(#[case] height_cm: f64, #[case] weight_kg: f64, #[case] ok: bool) {
        let request = CalorieRequest { height_cm, weight_kg, ..scenario_a() };
        assert_eq!(calculate_calories(&request).is_ok(), ok);
    }

    #[test]
    fn test_validate_is_side_effect_free() {
        let request = scenario_a();
        let before = request.clone();
        let first = validate(&request).unwrap();
        let second = validate(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(request, before);
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn activity_strategy() -> impl Strategy<Value = ActivityLevel> {
        prop::sample::select(ActivityLevel::ALL.to_vec())
    }

    fn goal_strategy() -> impl Strategy<Value = GoalType> {
        prop::sample::select(GoalType::ALL.to_vec())
    }

    fn request_strategy() -> impl Strategy<Value = CalorieRequest> {
        (
            1i32..=150,
            prop::bool::ANY,
            1.0f64..=300.0,
            1.0f64..=500.0,
            1.0f64..=500.0,
            activity_strategy(),
            goal_strategy(),
            0.1f64..200.0,
        )
            .prop_map(|(age, male, height_cm, weight_kg, goal_weight_kg, level, goal, weeks)| {
                CalorieRequest {
                    age,
                    gender: if male { Gender::Male } else { Gender::Female },
                    height_cm,
                    weight_kg,
                    goal_weight_kg,
                    activity_level: level.as_str().to_string(),
                    goal_type: goal.as_str().to_string(),
                    goal_timeframe_weeks: weeks,
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: every reported figure is a multiple of 10
        #[test]
        fn prop_outputs_are_multiples_of_ten(request in request_strategy()) {
            let result = calculate_calories(&request).unwrap();
            prop_assert_eq!(result.bmr % 10, 0);
            prop_assert_eq!(result.tdee % 10, 0);
            prop_assert_eq!(result.target_calories % 10, 0);
        }

        /// Property: the capped flag is set exactly for the two top tiers
        #[test]
        fn prop_capped_iff_top_tiers(request in request_strategy()) {
            let result = calculate_calories(&request).unwrap();
            let top_tier = request.activity_level == "Very active"
                || request.activity_level == "Super active";
            prop_assert_eq!(result.activity_capped, top_tier);
            prop_assert_eq!(result.activity_capped_message.is_some(), top_tier);
        }

        /// Property: identical requests serialize to identical bytes
        #[test]
        fn prop_deterministic(request in request_strategy()) {
            let first = serde_json::to_vec(&calculate_calories(&request).unwrap()).unwrap();
            let second = serde_json::to_vec(&calculate_calories(&request).unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: losing always applies the target deficit, not the max deficit
        #[test]
        fn prop_lose_deficit_is_target_deficit(tdee in 500.0f64..6000.0) {
            let target = compute_target_calories(tdee, GoalType::Lose);
            prop_assert!((tdee - target - LOSE_TARGET_DEFICIT_KCAL).abs() < 1e-9);
        }

        /// Property: rounding never moves a value by more than 5
        #[test]
        fn prop_rounding_is_nearest(value in -10000.0f64..10000.0) {
            let rounded = round_to_nearest_10(value) as f64;
            prop_assert!((rounded - value).abs() <= 5.0 + 1e-9);
        }
    }
}
