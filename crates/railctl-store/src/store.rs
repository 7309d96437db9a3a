use std::path::Path;
use std::sync::Arc;

use railctl_core::{Decision, DecisionId, NewDecision, Station};

use crate::error::StoreError;
use crate::file::FileStore;
use crate::memory::MemoryStore;

/// Minimum length of an id prefix accepted by [`DecisionStore::resolve`].
pub const MIN_PREFIX_LEN: usize = 4;

/// Persistence contract for decisions.
///
/// Decisions are immutable apart from per-station acknowledgement and
/// deletion. Implementations must apply `acknowledge` to the single
/// station's entry atomically, never by writing back a stale copy.
pub trait DecisionStore: Send + Sync {
    /// All decisions, newest-created first.
    fn list(&self) -> Result<Vec<Decision>, StoreError>;

    fn get(&self, id: &DecisionId) -> Result<Decision, StoreError>;

    /// Validate and persist a new decision, assigning id and timestamps.
    fn create(&self, new: NewDecision) -> Result<Decision, StoreError>;

    fn acknowledge(&self, id: &DecisionId, station: Station) -> Result<Decision, StoreError>;

    /// Hard delete. An unknown id is an error.
    fn delete(&self, id: &DecisionId) -> Result<(), StoreError>;

    /// Short name of the backend, for logs and health output.
    fn backend(&self) -> &'static str;

    /// Resolve a full id or a unique prefix of at least [`MIN_PREFIX_LEN`] chars.
    fn resolve(&self, id_or_prefix: &str) -> Result<Decision, StoreError> {
        let wanted = id_or_prefix.trim();
        match self.get(&DecisionId::from(wanted)) {
            Err(StoreError::NotFound(_)) => {}
            other => return other,
        }
        if wanted.len() < MIN_PREFIX_LEN {
            return Err(StoreError::NotFound(wanted.to_string()));
        }
        let mut matches: Vec<Decision> = self
            .list()?
            .into_iter()
            .filter(|d| d.id.as_str().starts_with(wanted))
            .collect();
        match matches.len() {
            0 => Err(StoreError::NotFound(wanted.to_string())),
            1 => Ok(matches.remove(0)),
            count => Err(StoreError::AmbiguousPrefix {
                prefix: wanted.to_string(),
                count,
            }),
        }
    }
}

/// Pick a backend: a document store under `data_dir` when configured,
/// otherwise a process-local memory store.
pub fn open_store(data_dir: Option<&Path>) -> Result<Arc<dyn DecisionStore>, StoreError> {
    match data_dir {
        Some(dir) => {
            let store = FileStore::open_or_init(dir)?;
            tracing::info!(root = %store.root().display(), "using file decision store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("no data directory configured; decisions are kept in memory and lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
