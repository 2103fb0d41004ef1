pub mod guidance;
pub mod questions;

use serde::Serialize;

pub use guidance::guidance_prompt;
pub use questions::questions_prompt;

/// Everything the generation service needs besides model and temperature:
/// the two instructions and the JSON Schema the reply must follow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredPrompt {
    pub system: String,
    pub user: String,
    pub schema: OutputSchema,
}

/// A named JSON Schema for the structured reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

impl OutputSchema {
    /// Top-level property names (sorted).
    pub fn field_names(&self) -> Vec<&str> {
        self.parameters["properties"]
            .as_object()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
