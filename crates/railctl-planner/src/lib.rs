//! Strategy planning for trains on the section: a model-backed planner
//! behind a pluggable generation backend, and an offline heuristic.

pub mod error;
pub mod extract;
pub mod gemini;
pub mod heuristic;
pub mod normalize;
pub mod prompt;
pub mod request;

use std::sync::Arc;

pub use error::PlannerError;
pub use gemini::{GeminiBackend, GeminiConfig, GenerationBackend};
pub use request::{PlanRequest, PlanResponse, TrainInputs};

/// Proxies plan requests to a generation backend and normalizes the reply.
#[derive(Clone, Default)]
pub struct Planner {
    backend: Option<Arc<dyn GenerationBackend>>,
}

impl Planner {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A planner with no backend; every plan fails with `NotConfigured`.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Gemini-backed when a key is present, unconfigured otherwise.
    pub fn from_gemini(config: Option<GeminiConfig>) -> Result<Self, PlannerError> {
        match config {
            Some(config) => Ok(Self::new(Arc::new(GeminiBackend::new(config)?))),
            None => Ok(Self::unconfigured()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        let backend = self.backend.as_ref().ok_or(PlannerError::NotConfigured)?;
        let prompt = prompt::build_prompt(request);
        let text = backend.generate(&prompt).await?;

        let reply = extract::parse_model_text(&text);
        if reply.is_none() {
            tracing::warn!(backend = backend.name(), "model reply had no usable JSON");
        }
        Ok(PlanResponse {
            alternatives: normalize::normalize_reply(reply.as_ref()),
        })
    }
}
