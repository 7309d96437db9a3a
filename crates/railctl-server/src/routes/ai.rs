//! Planning endpoints

use axum::{body::Bytes, extract::State, Json};
use serde::Serialize;

use railctl_core::Alternative;
use railctl_planner::{heuristic, PlanRequest, PlanResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// An absent body is an empty request; a present one must be JSON.
fn plan_request(body: &Bytes) -> ApiResult<PlanRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(PlanRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid plan request: {e}")))
}

/// Ask the model for strategies given the live section state.
pub async fn plan(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<PlanResponse>> {
    let request = plan_request(&body)?;
    let response = state.planner.plan(&request).await?;
    tracing::info!(alternatives = response.alternatives.len(), "plan produced");
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub summary: String,
    pub alternatives: Vec<Alternative>,
}

/// Offline rule-based strategies. Needs a priority and a destination.
pub async fn suggest(State(_state): State<AppState>, body: Bytes) -> ApiResult<Json<SuggestResponse>> {
    let request = plan_request(&body)?;
    let priority = request
        .inputs
        .priority()
        .ok_or_else(|| ApiError::BadRequest("What's the train priority?".to_string()))?;
    let destination = request
        .inputs
        .destination()
        .ok_or_else(|| ApiError::BadRequest("Destination station?".to_string()))?;

    Ok(Json(SuggestResponse {
        summary: heuristic::live_summary(&request.live),
        alternatives: heuristic::suggest(&request.live, priority, destination),
    }))
}
