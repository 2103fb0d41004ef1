use std::time::Duration;

use async_trait::async_trait;
use mediko_core::DriftError;
use mediko_prompts::StructuredPrompt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the generation service")]
    MissingCredential,

    #[error("invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("generation request failed: {0}")]
    Transport(String),

    #[error("generation service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("response does not match the requested schema: {0}")]
    Decode(String),

    #[error("response violates an output invariant: {0}")]
    SchemaDrift(#[from] DriftError),
}

impl GenerationError {
    /// True when the reply parsed but broke a count/range invariant.
    pub fn is_schema_drift(&self) -> bool {
        matches!(self, GenerationError::SchemaDrift(_))
    }
}

/// One structured-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub temperature: f32,
    pub prompt: StructuredPrompt,
}

/// Abstraction over the external structured-output endpoint.
///
/// Implementations send the system and user instructions together with the
/// output schema and return the reply as untyped JSON. Typing and invariant
/// checks happen in the generators, not here.
/// `OpenAiService` talks to an OpenAI-compatible HTTP API.
/// `MockService` replays scripted replies for tests.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest)
        -> Result<serde_json::Value, GenerationError>;
}
