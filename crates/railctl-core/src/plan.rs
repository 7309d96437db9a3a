use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decision::Directive;
use crate::section::{Line, Station};

/// A suggested strategy for a train, produced by a planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alternative {
    pub key: String,
    pub title: String,
    pub directive: Directive,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_through_line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_station: Option<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<u32>,
    pub explanation: String,
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.key, self.title, self.directive)?;
        if let Some(line) = self.pass_through_line {
            write!(f, " via {}", line)?;
        }
        if let Some(station) = self.loop_station {
            write!(f, " at {}", station)?;
            if let Some(id) = self.loop_id {
                write!(f, " loop {}", id)?;
            }
        }
        Ok(())
    }
}
