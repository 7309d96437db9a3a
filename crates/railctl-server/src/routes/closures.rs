use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use railctl_core::TrackClosure;

use crate::dto::{ClosureRequest, DecisionResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// File a track closure report as a blocking maintenance decision.
pub async fn report_closure(
    State(state): State<AppState>,
    body: Result<Json<ClosureRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DecisionResponse>)> {
    let Json(req) = body?;
    let closure = TrackClosure {
        line: req.line,
        from: req.from,
        to: req.to,
    };
    tracing::info!(closure = %closure.label(), "track closure reported");

    let new = closure.into_new_decision(req.author);
    let decision = state.with_store(move |store| store.create(new)).await?;
    Ok((StatusCode::CREATED, Json(DecisionResponse { decision })))
}
