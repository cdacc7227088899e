//! Coach WASM Module
//!
//! Browser bindings for the calorie engine and the app lifecycle tracker, so
//! web clients compute exactly what the backend does.

use coach_shared::calories::{self, GoalType};
use coach_shared::{AppLifecycle, AppState, CalorieRequest, ErrorResponse};
use wasm_bindgen::prelude::*;

/// Calculate calories from a JSON request body
///
/// Returns the camelCase outputs JSON, or an `{"error": ...}` JSON string as
/// the thrown value.
#[wasm_bindgen(js_name = calculateCalories)]
pub fn calculate_calories_json(request_json: &str) -> Result<String, JsValue> {
    calculate_to_json(request_json).map_err(|e| JsValue::from_str(&e))
}

/// Round half-up to the nearest 10
///
/// Returned as a JS number rather than a `BigInt`.
#[wasm_bindgen(js_name = roundToNearest10)]
pub fn round_to_nearest_10(value: f64) -> f64 {
    calories::round_to_nearest_10(value) as f64
}

/// Unrounded target calories for a TDEE and goal type (`lose`, `gain`, `maintain`)
#[wasm_bindgen(js_name = targetCalories)]
pub fn target_calories(tdee: f64, goal_type: &str) -> Result<f64, JsValue> {
    target_for_goal(tdee, goal_type).map_err(|e| JsValue::from_str(&e))
}

/// Lifecycle tracker handing back `app_open` events as JSON
#[wasm_bindgen]
#[derive(Default)]
pub struct Lifecycle {
    inner: AppLifecycle,
}

#[wasm_bindgen]
impl Lifecycle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the initial state and return the launch event
    pub fn initialize(&mut self, state: &str) -> Result<String, JsValue> {
        let state = parse_state(state).map_err(|e| JsValue::from_str(&e))?;
        let event = self.inner.initialize(state);
        serde_json::to_string(&event).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Record a state change; returns the event JSON or `undefined`
    pub fn transition(&mut self, state: &str) -> Result<Option<String>, JsValue> {
        let state = parse_state(state).map_err(|e| JsValue::from_str(&e))?;
        self.inner
            .transition(state)
            .map(|event| serde_json::to_string(&event))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn calculate_to_json(request_json: &str) -> Result<String, String> {
    let request: CalorieRequest =
        serde_json::from_str(request_json).map_err(|e| error_json(&e.to_string()))?;
    let outputs =
        calories::calculate_calories(&request).map_err(|e| error_json(&e.to_string()))?;
    serde_json::to_string(&outputs).map_err(|e| error_json(&e.to_string()))
}

fn target_for_goal(tdee: f64, goal_type: &str) -> Result<f64, String> {
    let goal: GoalType = goal_type.parse().map_err(|e: coach_shared::CalorieError| e.to_string())?;
    Ok(calories::compute_target_calories(tdee, goal))
}

fn parse_state(state: &str) -> Result<AppState, String> {
    serde_json::from_value(serde_json::Value::String(state.to_string()))
        .map_err(|_| format!("Unknown app state: {}", state))
}

fn error_json(message: &str) -> String {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| message.to_string())
}
