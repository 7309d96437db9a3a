use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use railctl_core::{Decision, DecisionId, NewDecision, Station};

use crate::error::StoreError;
use crate::store::DecisionStore;

/// Non-persistent store. Decisions live for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    // newest first
    decisions: RwLock<Vec<Decision>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Decision>> {
        self.decisions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Decision>> {
        self.decisions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl DecisionStore for MemoryStore {
    fn list(&self) -> Result<Vec<Decision>, StoreError> {
        Ok(self.read().clone())
    }

    fn get(&self, id: &DecisionId) -> Result<Decision, StoreError> {
        self.read()
            .iter()
            .find(|d| &d.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn create(&self, new: NewDecision) -> Result<Decision, StoreError> {
        let decision = Decision::issue(new, Utc::now())?;
        self.write().insert(0, decision.clone());
        Ok(decision)
    }

    fn acknowledge(&self, id: &DecisionId, station: Station) -> Result<Decision, StoreError> {
        let mut guard = self.write();
        let decision = guard
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        decision.acknowledge(station, Utc::now())?;
        Ok(decision.clone())
    }

    fn delete(&self, id: &DecisionId) -> Result<(), StoreError> {
        let mut guard = self.write();
        let idx = guard
            .iter()
            .position(|d| &d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        guard.remove(idx);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
