use std::fmt;
use std::time::Duration;

use crate::GenerationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-0613";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const QUESTION_TEMPERATURE: f32 = 1.0;
pub const GUIDANCE_TEMPERATURE: f32 = 0.7;

/// Process-wide generation settings. Built once at startup and handed to
/// both generators; never mutated afterwards.
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub question_temperature: f32,
    pub guidance_temperature: f32,
    pub timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            question_temperature: QUESTION_TEMPERATURE,
            guidance_temperature: GUIDANCE_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeneratorConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.base_url.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "base_url must not be empty".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(GenerationError::InvalidRequest(
                "model must not be empty".into(),
            ));
        }
        for (name, t) in [
            ("question_temperature", self.question_temperature),
            ("guidance_temperature", self.guidance_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(GenerationError::InvalidRequest(format!(
                    "{name} must be between 0.0 and 2.0 (got {t})"
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(GenerationError::InvalidRequest(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

// The API key never reaches logs.
impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("question_temperature", &self.question_temperature)
            .field("guidance_temperature", &self.guidance_temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
