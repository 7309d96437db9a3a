use serde::{Deserialize, Serialize};

use railctl_core::{Alternative, LiveState, Priority, Station};

/// Body of a plan request. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub live: LiveState,
    #[serde(default)]
    pub inputs: TrainInputs,
}

/// What the controller knows about the train being planned.
///
/// Kept as free text: the model receives whatever the controller typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<String>,
}

impl TrainInputs {
    pub fn priority(&self) -> Option<Priority> {
        self.priority.as_deref().and_then(|p| p.parse().ok())
    }

    pub fn destination(&self) -> Option<Station> {
        self.destination.as_deref().and_then(|d| d.parse().ok())
    }

    /// Fill fields from `other` where it has them.
    pub fn merge(&mut self, other: TrainInputs) {
        if other.priority.is_some() {
            self.priority = other.priority;
        }
        if other.destination.is_some() {
            self.destination = other.destination;
        }
        if other.current_position.is_some() {
            self.current_position = other.current_position;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.priority().is_some()
            && self.destination().is_some()
            && self
                .current_position
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub alternatives: Vec<Alternative>,
}
