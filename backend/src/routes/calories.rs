//! Calorie calculation route
//!
//! `POST /calculate-calories` computes BMR, TDEE and the goal-adjusted daily
//! target. `OPTIONS` answers CORS preflight; anything else is 405.

use super::method_not_allowed;
use crate::error::ApiResult;
use crate::services::CalorieService;
use crate::state::AppState;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{post, MethodRouter},
    Json,
};
use coach_shared::{CalorieOutputs, CalorieRequest};

/// Method router for the calorie endpoint
pub fn calorie_routes() -> MethodRouter<AppState> {
    post(calculate).options(preflight).fallback(method_not_allowed)
}

/// POST /calculate-calories
async fn calculate(
    payload: Result<Json<CalorieRequest>, JsonRejection>,
) -> ApiResult<Json<CalorieOutputs>> {
    let Json(request) = payload?;
    let outputs = CalorieService::calculate(&request)?;
    Ok(Json(outputs))
}

/// OPTIONS /calculate-calories
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
}
