//! Request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use railctl_core::projection::{LineState, StationState};
use railctl_core::{Decision, Line, LiveState, SectionState, Station};

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionsResponse {
    pub decisions: Vec<Decision>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub decision: Decision,
}

/// Station is kept as text so that a missing or unknown name can be
/// reported after the decision itself has been looked up.
#[derive(Debug, Default, Deserialize)]
pub struct AckRequest {
    #[serde(default)]
    pub station: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClosureRequest {
    pub line: Line,
    pub from: Station,
    #[serde(default)]
    pub to: Option<Station>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub ai_configured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub at: DateTime<Utc>,
    pub active_decisions: usize,
    pub lines: Vec<LineState>,
    pub stations: Vec<StationState>,
    pub live: LiveState,
}

impl From<SectionState> for SectionResponse {
    fn from(state: SectionState) -> Self {
        let live = state.live();
        Self {
            at: state.at,
            active_decisions: state.active_decisions,
            lines: state.lines,
            stations: state.stations,
            live,
        }
    }
}
