//! Decision feed endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use railctl_core::{DecisionId, NewDecision, Station};

use crate::dto::{AckRequest, DecisionResponse, DecisionsResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// All decisions, newest first
pub async fn list_decisions(State(state): State<AppState>) -> ApiResult<Json<DecisionsResponse>> {
    let decisions = state.with_store(|store| store.list()).await?;
    Ok(Json(DecisionsResponse { decisions }))
}

pub async fn get_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DecisionResponse>> {
    let id = DecisionId::from(id);
    let decision = state.with_store(move |store| store.get(&id)).await?;
    Ok(Json(DecisionResponse { decision }))
}

/// Issue a new decision
pub async fn create_decision(
    State(state): State<AppState>,
    body: Result<Json<NewDecision>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DecisionResponse>)> {
    let Json(new) = body?;
    let decision = state.with_store(move |store| store.create(new)).await?;
    tracing::info!(
        id = %decision.id,
        category = %decision.category,
        priority = %decision.priority,
        targets = decision.targets.len(),
        "decision issued"
    );
    Ok((StatusCode::CREATED, Json(DecisionResponse { decision })))
}

/// Acknowledge a decision on behalf of one target station.
///
/// An unknown decision is reported before anything about the body.
pub async fn acknowledge_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AckRequest>, JsonRejection>,
) -> ApiResult<Json<DecisionResponse>> {
    let id = DecisionId::from(id);
    let lookup = id.clone();
    state.with_store(move |store| store.get(&lookup)).await?;

    let Json(req) = body?;
    let name = req
        .station
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("station is required".to_string()))?;
    let station: Station = name
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown station: {}", name)))?;

    let decision = state
        .with_store(move |store| store.acknowledge(&id, station))
        .await?;
    tracing::info!(id = %decision.id, station = %station, "decision acknowledged");
    Ok(Json(DecisionResponse { decision }))
}

/// Withdraw a decision
pub async fn delete_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = DecisionId::from(id);
    let deleted = id.clone();
    state.with_store(move |store| store.delete(&id)).await?;
    tracing::info!(id = %deleted, "decision withdrawn");
    Ok(StatusCode::NO_CONTENT)
}
