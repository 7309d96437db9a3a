//! Domain model of the CDAE–SKG section-control desk: topology, decisions,
//! drafting and the occupancy projection.

pub mod decision;
pub mod draft;
pub mod error;
pub mod plan;
pub mod projection;
pub mod section;

pub use decision::{
    Acknowledgement, Category, Decision, DecisionEffect, DecisionId, DecisionMeta, Directive,
    LoopAssignment, NewDecision, Priority, TrackClosure,
};
pub use draft::DecisionDraft;
pub use error::CoreError;
pub use plan::Alternative;
pub use projection::{project, LineBucket, LiveState, SectionState};
pub use section::{Line, Station, Status};
