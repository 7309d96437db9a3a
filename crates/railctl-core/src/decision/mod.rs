pub mod effect;
pub mod meta;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::section::Station;

pub use effect::{DecisionEffect, LoopAssignment};
pub use meta::{DecisionMeta, Directive, TrackClosure};

/// Issuer recorded when a new decision names no author.
pub const DEFAULT_AUTHOR: &str = "Section Controller";

/// Server-assigned identifier of a decision (UUID v4 text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(String);

impl DecisionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 chars, used for display.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl From<String> for DecisionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DecisionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Movement,
    Maintenance,
    Safety,
    Power,
    Emergency,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Movement,
        Category::Maintenance,
        Category::Safety,
        Category::Power,
        Category::Emergency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Maintenance => "Maintenance",
            Self::Safety => "Safety",
            Self::Power => "Power",
            Self::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownValue {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Urgency of a decision. Only affects display and planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Critical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Low and Normal traffic gives way to other movements.
    pub fn yields(&self) -> bool {
        matches!(self, Self::Low | Self::Normal)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" | "medium" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::UnknownValue {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-station acknowledgement state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub acknowledged: bool,
    pub at: Option<DateTime<Utc>>,
}

/// A directive issued to one or more stations on the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: DecisionId,
    pub message: String,
    pub category: Category,
    pub priority: Priority,
    pub targets: Vec<Station>,
    pub created_at: DateTime<Utc>,
    pub effective_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub author: String,
    pub acknowledgements: BTreeMap<Station, Acknowledgement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<DecisionEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DecisionMeta>,
}

/// Client-submitted payload for creating a decision.
///
/// The required fields are optional here so that a missing one surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDecision {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub targets: Vec<Station>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<DecisionEffect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DecisionMeta>,
}

impl NewDecision {
    /// Check required fields and the effective window.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut missing = Vec::new();
        if self.message.as_deref().map_or(true, |m| m.trim().is_empty()) {
            missing.push("message");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        if self.priority.is_none() {
            missing.push("priority");
        }
        if self.targets.is_empty() {
            missing.push("targets");
        }
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }
        if let (Some(eff), Some(exp)) = (self.effective_at, self.expires_at) {
            if eff > exp {
                return Err(CoreError::Validation(format!(
                    "effectiveAt ({}) is after expiresAt ({})",
                    eff.to_rfc3339(),
                    exp.to_rfc3339()
                )));
            }
        }
        Ok(())
    }
}

impl Decision {
    /// Materialize a validated decision, stamping id, timestamps and
    /// an unacknowledged entry for every target.
    pub fn issue(new: NewDecision, now: DateTime<Utc>) -> Result<Self, CoreError> {
        new.validate()?;
        let NewDecision {
            message,
            category,
            priority,
            targets,
            effective_at,
            expires_at,
            author,
            effect,
            meta,
        } = new;

        let mut unique = Vec::with_capacity(targets.len());
        for t in targets {
            if !unique.contains(&t) {
                unique.push(t);
            }
        }
        let acknowledgements = unique
            .iter()
            .map(|s| (*s, Acknowledgement::default()))
            .collect();

        Ok(Self {
            id: DecisionId::generate(),
            message: message.unwrap_or_default().trim().to_string(),
            // validate() guarantees both are present
            category: category.unwrap_or(Category::Movement),
            priority: priority.unwrap_or(Priority::Normal),
            targets: unique,
            created_at: now,
            effective_at: effective_at.unwrap_or(now),
            expires_at,
            author: author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            acknowledgements,
            effect,
            meta,
        })
    }

    /// Whether the effective window `[effective_at, expires_at)` contains `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.effective_at <= now && self.expires_at.map_or(true, |exp| now < exp)
    }

    pub fn targets_station(&self, station: Station) -> bool {
        self.acknowledgements.contains_key(&station)
    }

    /// Mark one target station as acknowledged. Fails without mutating
    /// anything when the station is not a target.
    pub fn acknowledge(&mut self, station: Station, at: DateTime<Utc>) -> Result<(), CoreError> {
        match self.acknowledgements.get_mut(&station) {
            Some(ack) => {
                ack.acknowledged = true;
                ack.at = Some(at);
                Ok(())
            }
            None => Err(CoreError::NotTargeted {
                station: station.to_string(),
                id: self.id.to_string(),
            }),
        }
    }

    /// (acknowledged, total) target counts.
    pub fn ack_progress(&self) -> (usize, usize) {
        let done = self
            .acknowledgements
            .values()
            .filter(|a| a.acknowledged)
            .count();
        (done, self.acknowledgements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_new() -> NewDecision {
        NewDecision {
            message: Some("Pass the train through the target stations.".into()),
            category: Some(Category::Movement),
            priority: Some(Priority::Normal),
            targets: vec![Station::Chandanpur, Station::Saktigarh],
            ..Default::default()
        }
    }

    #[test]
    fn issue_initializes_acknowledgements_for_every_target() {
        let now = Utc::now();
        let d = Decision::issue(sample_new(), now).unwrap();
        assert_eq!(d.acknowledgements.len(), 2);
        for station in [Station::Chandanpur, Station::Saktigarh] {
            assert_eq!(d.acknowledgements[&station], Acknowledgement::default());
        }
        assert_eq!(d.created_at, now);
        assert_eq!(d.effective_at, now);
        assert_eq!(d.expires_at, None);
        assert_eq!(d.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn issue_serializes_ack_shape() {
        let d = Decision::issue(sample_new(), Utc::now()).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(
            json["acknowledgements"]["Chandanpur"],
            serde_json::json!({"acknowledged": false, "at": null})
        );
        assert!(json["expiresAt"].is_null());
        assert!(json.get("effect").is_none());
    }

    #[test]
    fn issue_dedupes_targets() {
        let mut new = sample_new();
        new.targets = vec![Station::Gurap, Station::Gurap, Station::Belmuri];
        let d = Decision::issue(new, Utc::now()).unwrap();
        assert_eq!(d.targets, vec![Station::Gurap, Station::Belmuri]);
    }

    #[test]
    fn validate_reports_all_missing_fields() {
        let err = NewDecision::default().validate().unwrap_err();
        let msg = err.to_string();
        for field in ["message", "category", "priority", "targets"] {
            assert!(msg.contains(field), "{msg} should mention {field}");
        }
    }

    #[test]
    fn validate_rejects_blank_message() {
        let mut new = sample_new();
        new.message = Some("   ".into());
        assert!(new.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_window() {
        let now = Utc::now();
        let mut new = sample_new();
        new.effective_at = Some(now + Duration::hours(2));
        new.expires_at = Some(now + Duration::hours(1));
        assert!(new.validate().is_err());
    }

    #[test]
    fn active_window_is_half_open() {
        let now = Utc::now();
        let mut new = sample_new();
        new.effective_at = Some(now);
        new.expires_at = Some(now + Duration::minutes(10));
        let d = Decision::issue(new, now).unwrap();
        assert!(d.is_active_at(now));
        assert!(d.is_active_at(now + Duration::minutes(9)));
        assert!(!d.is_active_at(now + Duration::minutes(10)));
        assert!(!d.is_active_at(now - Duration::seconds(1)));
    }

    #[test]
    fn acknowledge_unknown_station_leaves_decision_untouched() {
        let mut d = Decision::issue(sample_new(), Utc::now()).unwrap();
        let before = d.clone();
        assert!(d.acknowledge(Station::Gurap, Utc::now()).is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn acknowledge_marks_single_station() {
        let mut d = Decision::issue(sample_new(), Utc::now()).unwrap();
        let at = Utc::now();
        d.acknowledge(Station::Saktigarh, at).unwrap();
        assert!(d.acknowledgements[&Station::Saktigarh].acknowledged);
        assert_eq!(d.acknowledgements[&Station::Saktigarh].at, Some(at));
        assert!(!d.acknowledgements[&Station::Chandanpur].acknowledged);
        assert_eq!(d.ack_progress(), (1, 2));
    }

    #[test]
    fn new_decision_accepts_wire_shape() {
        let body = serde_json::json!({
            "message": "Halt",
            "category": "Safety",
            "priority": "Critical",
            "targets": ["Dhaniakhali Halt"],
            "expiresAt": null,
            "meta": {"passThroughLine": "Down Main", "directive": "halt"}
        });
        let new: NewDecision = serde_json::from_value(body).unwrap();
        assert_eq!(new.targets, vec![Station::DhaniakhaliHalt]);
        assert!(new.validate().is_ok());
    }
}
