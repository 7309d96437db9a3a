use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::section::{Line, Station, Status};

/// A train held on a specific loop (1-based) at a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopAssignment {
    pub station: Station,
    pub loop_id: u32,
    pub train: String,
}

/// Explicit state overrides a decision applies while it is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionEffect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<BTreeMap<Line, Status>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_assignments: Option<Vec<LoopAssignment>>,
}

impl DecisionEffect {
    pub fn is_empty(&self) -> bool {
        self.lines.as_ref().map_or(true, BTreeMap::is_empty)
            && self.station_status.is_none()
            && self.loop_assignments.as_ref().map_or(true, Vec::is_empty)
    }

    pub fn line(line: Line, status: Status) -> Self {
        Self {
            lines: Some(BTreeMap::from([(line, status)])),
            ..Default::default()
        }
    }
}
