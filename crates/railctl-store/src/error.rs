use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid decision: {0}")]
    Validation(String),

    #[error("decision not found: {0}")]
    NotFound(String),

    #[error("ambiguous decision prefix '{prefix}': matches {count} decisions")]
    AmbiguousPrefix { prefix: String, count: usize },

    #[error("{0}")]
    InvalidTarget(String),

    #[error("store not found (searched upward from {0})")]
    StoreNotFound(String),

    #[error("store already exists at {0}")]
    StoreExists(String),

    #[error("lock file conflict: {0}")]
    LockConflict(String),
}

impl From<railctl_core::CoreError> for StoreError {
    fn from(e: railctl_core::CoreError) -> Self {
        use railctl_core::CoreError;
        match e {
            CoreError::NotTargeted { .. } => Self::InvalidTarget(e.to_string()),
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Validation(other.to_string()),
        }
    }
}
