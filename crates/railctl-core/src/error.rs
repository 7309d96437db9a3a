use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid decision: {0}")]
    Validation(String),

    #[error("station {station} is not targeted by decision {id}")]
    NotTargeted { station: String, id: String },

    #[error("unknown station: {0}")]
    UnknownStation(String),

    #[error("unknown line: {0}")]
    UnknownLine(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
