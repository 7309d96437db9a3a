//! Occupancy projection: live section state derived from the decision log.
//!
//! The projection is recomputed from scratch on every read. Active decisions
//! are folded oldest-first so that the explicit fields of later decisions
//! override earlier ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::decision::Decision;
use crate::section::{Line, Station, Status};

/// Load at which a line is displayed as congested.
pub const CONGESTED_LOAD: u32 = 3;

/// Display bucket of a running line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineBucket {
    Clear,
    Busy,
    Congested,
    Blocked,
}

impl LineBucket {
    pub fn classify(load: u32, blocked: bool) -> Self {
        if blocked {
            Self::Blocked
        } else if load >= CONGESTED_LOAD {
            Self::Congested
        } else if load >= 1 {
            Self::Busy
        } else {
            Self::Clear
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Busy => "Busy",
            Self::Congested => "Congested",
            Self::Blocked => "Blocked",
        }
    }
}

impl fmt::Display for LineBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineState {
    pub line: Line,
    /// Number of active pass-through directives on this line.
    pub load: u32,
    /// Sticky: once an active decision blocks the line it stays blocked.
    pub blocked: bool,
    /// Last explicit status from `effect.lines`, Free if none.
    pub status: Status,
    pub bucket: LineBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopState {
    pub id: u32,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub train: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationState {
    pub station: Station,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub status: Status,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loops: Vec<LoopState>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub line_status: BTreeMap<Line, Status>,
}

/// Line loads and blocked flags, the snapshot handed to the planner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveState {
    #[serde(default)]
    pub loads: BTreeMap<Line, u32>,
    #[serde(default)]
    pub blocked: BTreeMap<Line, bool>,
}

impl LiveState {
    pub fn load(&self, line: Line) -> u32 {
        self.loads.get(&line).copied().unwrap_or(0)
    }

    pub fn is_blocked(&self, line: Line) -> bool {
        self.blocked.get(&line).copied().unwrap_or(false)
    }

    pub fn blocked_lines(&self) -> Vec<Line> {
        Line::ALL.into_iter().filter(|l| self.is_blocked(*l)).collect()
    }

    /// Unblocked line with the lowest load; ties resolve in line order.
    pub fn best_line(&self) -> Option<Line> {
        Line::ALL
            .into_iter()
            .filter(|l| !self.is_blocked(*l))
            .min_by_key(|l| self.load(*l))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionState {
    pub at: DateTime<Utc>,
    pub active_decisions: usize,
    pub lines: Vec<LineState>,
    pub stations: Vec<StationState>,
}

impl SectionState {
    pub fn line(&self, line: Line) -> &LineState {
        // lines is always built from Line::ALL in order
        &self.lines[line as usize]
    }

    pub fn station(&self, station: Station) -> &StationState {
        &self.stations[station as usize]
    }

    pub fn live(&self) -> LiveState {
        LiveState {
            loads: self.lines.iter().map(|l| (l.line, l.load)).collect(),
            blocked: self
                .lines
                .iter()
                .filter(|l| l.blocked)
                .map(|l| (l.line, true))
                .collect(),
        }
    }

    /// Stations whose name contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<&StationState> {
        let q = query.trim().to_lowercase();
        self.stations
            .iter()
            .filter(|s| s.station.name().to_lowercase().contains(&q))
            .collect()
    }
}

#[derive(Default)]
struct LineAcc {
    load: u32,
    blocked: bool,
    status: Status,
}

#[derive(Default)]
struct StationAcc {
    status: Status,
    updated_at: Option<DateTime<Utc>>,
    line_status: BTreeMap<Line, Status>,
    loops: BTreeMap<u32, (String, DateTime<Utc>)>,
}

/// Decisions whose effective window contains `now`, oldest-created first.
pub fn active_in_order(decisions: &[Decision], now: DateTime<Utc>) -> Vec<&Decision> {
    let mut active: Vec<&Decision> = decisions.iter().filter(|d| d.is_active_at(now)).collect();
    active.sort_by_key(|d| d.created_at);
    active
}

/// Project the decision log into the live state of the section at `now`.
pub fn project(decisions: &[Decision], now: DateTime<Utc>) -> SectionState {
    let active = active_in_order(decisions, now);

    let mut lines: BTreeMap<Line, LineAcc> =
        Line::ALL.into_iter().map(|l| (l, LineAcc::default())).collect();
    let mut stations: BTreeMap<Station, StationAcc> = Station::ALL
        .into_iter()
        .map(|s| (s, StationAcc::default()))
        .collect();

    for d in &active {
        let meta = d.meta.as_ref();
        let effect = d.effect.as_ref();
        let pass_line = meta.and_then(|m| m.pass_through_line);

        if let Some(line) = pass_line {
            if let Some(acc) = lines.get_mut(&line) {
                acc.load += 1;
            }
        }

        if let Some(explicit) = effect.and_then(|e| e.lines.as_ref()) {
            for (line, status) in explicit {
                let Some(acc) = lines.get_mut(line) else { continue };
                acc.status = *status;
                match status {
                    Status::Blocked => acc.blocked = true,
                    Status::Occupied | Status::Maintenance => acc.load = acc.load.max(1),
                    Status::Free => {}
                }
            }
        }

        if let Some(m) = meta {
            for line in m.closed_lines() {
                if let Some(acc) = lines.get_mut(&line) {
                    acc.blocked = true;
                }
            }
        }

        if let Some(status) = effect.and_then(|e| e.station_status) {
            for target in &d.targets {
                if let Some(acc) = stations.get_mut(target) {
                    acc.status = status;
                    acc.updated_at = Some(d.created_at);
                }
            }
        }

        if let Some(assignments) = effect.and_then(|e| e.loop_assignments.as_ref()) {
            for la in assignments {
                if la.loop_id == 0 || la.loop_id > la.station.loop_count() {
                    continue;
                }
                if let Some(acc) = stations.get_mut(&la.station) {
                    acc.loops.insert(la.loop_id, (la.train.clone(), d.created_at));
                }
            }
        }

        let position = meta
            .and_then(|m| m.current_position.as_deref())
            .and_then(Station::find_in_text);
        if let (Some(station), Some(line)) = (position, pass_line) {
            if let Some(acc) = stations.get_mut(&station) {
                acc.line_status.insert(line, Status::Occupied);
                acc.updated_at = Some(d.created_at);
            }
        }
    }

    let lines = lines
        .into_iter()
        .map(|(line, acc)| LineState {
            line,
            load: acc.load,
            blocked: acc.blocked,
            status: acc.status,
            bucket: LineBucket::classify(acc.load, acc.blocked),
        })
        .collect();

    let stations = stations
        .into_iter()
        .map(|(station, acc)| {
            let loops = (1..=station.loop_count())
                .map(|id| match acc.loops.get(&id) {
                    Some((train, at)) => LoopState {
                        id,
                        status: Status::Occupied,
                        train: Some(train.clone()),
                        updated_at: Some(*at),
                    },
                    None => LoopState {
                        id,
                        status: acc.status,
                        train: None,
                        updated_at: acc.updated_at,
                    },
                })
                .collect();
            StationState {
                station,
                code: station.code().map(String::from),
                status: acc.status,
                updated_at: acc.updated_at,
                loops,
                line_status: acc.line_status,
            }
        })
        .collect();

    SectionState {
        at: now,
        active_decisions: active.len(),
        lines,
        stations,
    }
}
