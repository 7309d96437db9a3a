//! Decision drafting: the controller's form state before it is issued.

use chrono::{DateTime, Utc};

use crate::decision::{
    Category, DecisionEffect, DecisionMeta, Directive, LoopAssignment, NewDecision, Priority,
    DEFAULT_AUTHOR,
};
use crate::plan::Alternative;
use crate::section::{Line, Station};

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionDraft {
    pub category: Category,
    pub priority: Priority,
    pub targets: Vec<Station>,
    pub author: String,
    pub directive: Directive,
    pub pass_through_line: Option<Line>,
    pub loop_station: Option<Station>,
    pub loop_id: Option<u32>,
    pub consist_no: Option<String>,
    pub consist_destination: Option<String>,
    pub current_position: Option<String>,
    /// Replaces the composed message when set.
    pub message: Option<String>,
    pub effective_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for DecisionDraft {
    fn default() -> Self {
        Self {
            category: Category::Movement,
            priority: Priority::Normal,
            targets: Station::ALL.to_vec(),
            author: DEFAULT_AUTHOR.to_string(),
            directive: Directive::Pass,
            pass_through_line: None,
            loop_station: None,
            loop_id: None,
            consist_no: None,
            consist_destination: None,
            current_position: None,
            message: None,
            effective_at: None,
            expires_at: None,
        }
    }
}

impl DecisionDraft {
    /// Selecting a loop station starts at its first loop.
    pub fn select_loop_station(&mut self, station: Station) {
        self.loop_station = Some(station);
        self.loop_id = Some(1);
    }

    /// Directive text derived from the structured fields.
    pub fn compose_message(&self) -> String {
        match self.directive {
            Directive::Pass => match self.pass_through_line {
                Some(line) => format!("Pass the train through via {} Line at target stations.", line),
                None => "Pass the train through the target stations.".to_string(),
            },
            Directive::Halt => "Halt the train at the target stations.".to_string(),
            Directive::Stable => match self.loop_station {
                Some(station) => match self.loop_id {
                    Some(id) => format!("Stable the train at {} (Loop {}).", station, id),
                    None => format!("Stable the train at {}.", station),
                },
                None => "Stable the train at the target station.".to_string(),
            },
        }
    }

    /// Merge a planner suggestion into the draft. The alternative's directive
    /// and routing fields replace the draft's; priority is kept unless given.
    pub fn apply_alternative(&mut self, priority: Option<Priority>, alt: &Alternative) {
        if let Some(p) = priority {
            self.priority = p;
        }
        self.directive = alt.directive;
        self.pass_through_line = alt.pass_through_line;
        self.loop_station = alt.loop_station;
        self.loop_id = alt.loop_id;
    }

    fn loop_assignment(&self) -> Option<LoopAssignment> {
        let station = self.loop_station?;
        let loop_id = self.loop_id?;
        let train = self.consist_no.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
        Some(LoopAssignment {
            station,
            loop_id,
            train: train.to_string(),
        })
    }

    pub fn into_new_decision(self) -> NewDecision {
        let message = self
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.compose_message());
        let effect = DecisionEffect {
            loop_assignments: self.loop_assignment().map(|la| vec![la]),
            ..Default::default()
        };
        let meta = DecisionMeta {
            consist_no: self.consist_no,
            consist_destination: self.consist_destination,
            pass_through_line: self.pass_through_line,
            loop_station: self.loop_station,
            loop_id: self.loop_id,
            current_position: self.current_position,
            directive: Some(self.directive),
            ..Default::default()
        };
        NewDecision {
            message: Some(message),
            category: Some(self.category),
            priority: Some(self.priority),
            targets: self.targets,
            effective_at: self.effective_at,
            expires_at: self.expires_at,
            author: Some(self.author),
            effect: (!effect.is_empty()).then_some(effect),
            meta: Some(meta),
        }
    }
}
