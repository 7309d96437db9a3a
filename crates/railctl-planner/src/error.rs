use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("GEMINI_API_KEY not configured")]
    NotConfigured,

    #[error("upstream model returned {status}")]
    Upstream { status: u16, body: String },

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("could not decode upstream response: {0}")]
    Decode(String),
}
