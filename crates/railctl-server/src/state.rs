//! Application state for the API server

use std::sync::Arc;

use railctl_planner::Planner;
use railctl_store::{open_store, DecisionStore, StoreError};

use crate::config::{ApiConfig, DEFAULT_PING_MESSAGE};
use crate::error::ApiError;

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DecisionStore>,
    pub planner: Planner,
    /// Body of `GET /api/ping`
    pub ping_message: String,
    pub version: String,
}

impl AppState {
    pub fn new(store: Arc<dyn DecisionStore>, planner: Planner) -> Self {
        Self {
            store,
            planner,
            ping_message: DEFAULT_PING_MESSAGE.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn with_ping_message(mut self, message: impl Into<String>) -> Self {
        self.ping_message = message.into();
        self
    }

    /// Open the configured store and planner.
    pub fn from_config(config: &ApiConfig) -> anyhow::Result<Self> {
        let store = open_store(config.data_dir.as_deref())?;
        let planner = Planner::from_gemini(config.gemini.clone())?;
        if !planner.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set; /api/ai/plan will fail");
        }
        Ok(Self::new(store, planner).with_ping_message(config.ping_message.clone()))
    }

    /// Run a store operation off the async runtime. File-backed stores do
    /// blocking IO and may sleep while waiting for a document lock.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn DecisionStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
            .map_err(ApiError::from)
    }
}
