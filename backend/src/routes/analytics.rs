//! Analytics API routes

use super::method_not_allowed;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use coach_shared::validation::validate_event_name;
use coach_shared::{AnalyticsEvent, AnalyticsEventRequest};
use validator::Validate;

/// Create analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/events", post(track_event).fallback(method_not_allowed))
}

/// POST /api/v1/analytics/events - Queue an event for the configured sink
///
/// Returns as soon as the event is queued; delivery happens in the background.
async fn track_event(
    State(state): State<AppState>,
    payload: Result<Json<AnalyticsEventRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    req.validate()?;
    validate_event_name(&req.name)?;

    state.analytics().track(AnalyticsEvent {
        name: req.name,
        params: req.params,
    });

    Ok(StatusCode::ACCEPTED)
}
