//! API route handlers

pub mod ai;
pub mod closures;
pub mod decisions;
pub mod health;
pub mod section;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/api/ping", get(health::ping))
        // Decision feed
        .route(
            "/api/decisions",
            get(decisions::list_decisions).post(decisions::create_decision),
        )
        .route(
            "/api/decisions/:id",
            get(decisions::get_decision).delete(decisions::delete_decision),
        )
        .route("/api/decisions/:id/ack", post(decisions::acknowledge_decision))
        // Closures and occupancy
        .route("/api/closures", post(closures::report_closure))
        .route("/api/section", get(section::section_state))
        // Planning
        .route("/api/ai/plan", post(ai::plan))
        .route("/api/ai/suggest", post(ai::suggest))
        .with_state(state)
}
