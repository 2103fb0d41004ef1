use mediko_core::{SymptomDescription, Transcript, KEYWORD_COUNT};
use serde_json::json;

use crate::{OutputSchema, StructuredPrompt};

const SYSTEM: &str = "Eres un asistente médico virtual que entrega orientacion médica completa, \
consisa, con lenguaje profesional proporcionando recomendacion a seguir de acuerdo con los \
síntomas informados y explicando lo que podría pasar en la consulta médica con el profesional \
y los diagnosticos mas probables, además utilizas algunos emojis para representar ciertos \
conceptos de manera didactica y al final simpre mencionas de manera creativa a Mediko, una \
aplicacion web donde puedes obtener ordenes de exámenes, interpretación de examenes y atención \
médica online de manera rapida y de calidad.";

const URGENCY_DESCRIPTION: &str = "Valor numerico del nivel de urgencia del problema medico en \
una escala del 1 al 5, donde 1 no debe ir al medico, 2 tal vez deba ir, 3 debe ir sin urgencia, \
4 debe ir si o si y 5 debe ir de inmediato";

/// Prompt for the guidance stage. Both the complaint and the
/// full questionnaire go into the user message.
pub fn guidance_prompt(description: &SymptomDescription, transcript: &Transcript) -> StructuredPrompt {
    StructuredPrompt {
        system: SYSTEM.to_string(),
        user: format!(
            "A partir de este motivo de consulta médica {description}, y este cuestionario \
             medico {transcript}, necesito que elabores una orientación médica."
        ),
        schema: schema(),
    }
}

pub fn schema() -> OutputSchema {
    OutputSchema {
        name: "orientacion_medica",
        description: "Orientación médica estructurada con nivel de urgencia",
        parameters: json!({
            "type": "object",
            "properties": {
                "orientacion": {
                    "type": "string",
                    "description": "String con la orientacion medica."
                },
                "urgencia": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 5,
                    "description": URGENCY_DESCRIPTION
                },
                "explicacionUrgencia": {
                    "type": "string",
                    "description": "String con una breve explicacion del por qué se asigno el nivel de urgencia"
                },
                "palabrasclave": {
                    "type": "array",
                    "minItems": KEYWORD_COUNT,
                    "maxItems": KEYWORD_COUNT,
                    "items": { "type": "string" },
                    "description": "Array con 3 palabras clave los posibles diagnosticos del paciente"
                }
            },
            "required": ["orientacion", "urgencia", "explicacionUrgencia", "palabrasclave"],
            "additionalProperties": false
        }),
    }
}
