use mediko_core::{SymptomDescription, QUESTION_COUNT};
use serde_json::json;

use crate::{OutputSchema, StructuredPrompt};

const SYSTEM: &str = "A partir del motivo de consulta médica, genera 7 preguntas clave y \
faciles de responder que ayuden a un médico a llegar a un diagnóstico adecuado.";

/// Prompt for the follow-up question stage.
pub fn questions_prompt(description: &SymptomDescription) -> StructuredPrompt {
    StructuredPrompt {
        system: SYSTEM.to_string(),
        user: format!("Motivo de consulta: {description}"),
        schema: schema(),
    }
}

/// `{ preguntas: [{ pregunta: string }] }` with exactly [`QUESTION_COUNT`] items.
pub fn schema() -> OutputSchema {
    OutputSchema {
        name: "preguntas_de_consulta",
        description: "Preguntas de seguimiento a partir del motivo de consulta",
        parameters: json!({
            "type": "object",
            "properties": {
                "preguntas": {
                    "type": "array",
                    "description": "Un array de 7 preguntas a partir del motivo de consulta medica",
                    "minItems": QUESTION_COUNT,
                    "maxItems": QUESTION_COUNT,
                    "items": {
                        "type": "object",
                        "properties": {
                            "pregunta": {
                                "type": "string",
                                "description": "Una pregunta a partir del motivo de consulta"
                            }
                        },
                        "required": ["pregunta"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["preguntas"],
            "additionalProperties": false
        }),
    }
}
