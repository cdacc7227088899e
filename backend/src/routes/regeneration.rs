//! Plan regeneration API routes

use super::method_not_allowed;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use coach_shared::{RegenerationRequest, RegenerationStatus};

/// Create regeneration routes
pub fn regeneration_routes() -> Router<AppState> {
    Router::new()
        .route("/check", post(check).fallback(method_not_allowed))
        .route("/record", post(record).fallback(method_not_allowed))
}

/// POST /api/v1/regeneration/check - May this user regenerate this plan now?
async fn check(
    State(state): State<AppState>,
    payload: Result<Json<RegenerationRequest>, JsonRejection>,
) -> ApiResult<Json<RegenerationStatus>> {
    let Json(req) = payload?;
    let status = state.limiter().check(req.user_id, req.plan_type).await?;
    Ok(Json(status))
}

/// POST /api/v1/regeneration/record - Start a new cooldown window
async fn record(
    State(state): State<AppState>,
    payload: Result<Json<RegenerationRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    state.limiter().record(req.user_id, req.plan_type).await?;
    Ok(StatusCode::NO_CONTENT)
}
