//! Health check endpoints

use axum::{extract::State, Json};

use crate::dto::{HealthResponse, PingResponse};
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        store: state.store.backend().to_string(),
        ai_configured: state.planner.is_configured(),
    })
}

pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        message: state.ping_message.clone(),
    })
}
