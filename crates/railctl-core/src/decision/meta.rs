use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decision::{Category, DecisionEffect, NewDecision, Priority, DEFAULT_AUTHOR};
use crate::error::CoreError;
use crate::section::{Line, Station, Status};

/// Operational instruction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    #[default]
    Pass,
    Halt,
    Stable,
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Halt => "halt",
            Self::Stable => "stable",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directive {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pass" => Ok(Self::Pass),
            "halt" => Ok(Self::Halt),
            "stable" => Ok(Self::Stable),
            _ => Err(CoreError::UnknownValue {
                kind: "directive",
                value: s.to_string(),
            }),
        }
    }
}

/// A structured track closure: a line closed between two stations, or at one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackClosure {
    pub line: Line,
    pub from: Station,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Station>,
}

impl TrackClosure {
    /// Human-readable label, also stored as `meta.trackClosure`.
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!("{} closed between {} and {}", self.line, self.from, to),
            None => format!("{} closed at {}", self.line, self.from),
        }
    }

    pub fn targets(&self) -> Vec<Station> {
        match self.to {
            Some(to) if to != self.from => vec![self.from, to],
            _ => vec![self.from],
        }
    }

    /// The decision a closure report files: Maintenance / High, blocking the line.
    pub fn into_new_decision(self, author: Option<String>) -> NewDecision {
        NewDecision {
            message: Some("Track closure".into()),
            category: Some(Category::Maintenance),
            priority: Some(Priority::High),
            targets: self.targets(),
            author: Some(author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string())),
            effect: Some(DecisionEffect::line(self.line, Status::Blocked)),
            meta: Some(DecisionMeta {
                track_closure: Some(self.label()),
                closure: Some(self),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

/// Free-form directive detail attached to a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consist_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consist_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_through_line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_station: Option<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<u32>,
    /// Display label of a closure. Parsed heuristically only when `closure` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_closure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure: Option<TrackClosure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directive: Option<Directive>,
}

impl DecisionMeta {
    /// Lines a closure on this decision blocks.
    ///
    /// Structured closures are authoritative; free text falls back to
    /// keyword matching ("up"+"main", "down"+"main", "reverse").
    pub fn closed_lines(&self) -> Vec<Line> {
        if let Some(closure) = &self.closure {
            return vec![closure.line];
        }
        let text = match &self.track_closure {
            Some(t) if !t.trim().is_empty() => t.to_lowercase(),
            _ => return Vec::new(),
        };
        let mut lines = Vec::new();
        if text.contains("up") && text.contains("main") {
            lines.push(Line::UpMain);
        }
        if text.contains("down") && text.contains("main") {
            lines.push(Line::DownMain);
        }
        if text.contains("reverse") {
            lines.push(Line::Reverse);
        }
        lines
    }

    pub fn is_closure(&self) -> bool {
        self.closure.is_some()
            || self
                .track_closure
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}
