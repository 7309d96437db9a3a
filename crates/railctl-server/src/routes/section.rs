use axum::{extract::State, Json};
use chrono::Utc;

use railctl_core::project;

use crate::dto::SectionResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Occupancy projection of the active decisions, as of now.
pub async fn section_state(State(state): State<AppState>) -> ApiResult<Json<SectionResponse>> {
    let decisions = state.with_store(|store| store.list()).await?;
    Ok(Json(project(&decisions, Utc::now()).into()))
}
